//! Server-rendered word card page
//!
//! Reads the session state and nothing else; every control posts an intent
//! back to the page routes.

use std::fmt::Write as _;

use crate::domain::aggregates::SessionState;
use crate::domain::entities::{CharacterGroup, GenerationResult};
use crate::domain::services::annotation_markers;
use crate::domain::value_objects::ScenePreset;

const STYLE: &str = r#"
body { margin: 0; background: #FDF6F6; color: #292524; font-family: system-ui, sans-serif; }
header { background: rgba(255,255,255,.8); border-bottom: 1px solid #fce7f3; padding: 16px 24px; display: flex; justify-content: space-between; align-items: center; }
header h1 { margin: 0; font-size: 24px; color: #ec4899; }
.badge { font-size: 12px; font-weight: bold; color: #a8a29e; background: #f5f5f4; padding: 6px 12px; border-radius: 999px; }
main { max-width: 1152px; margin: 0 auto; padding: 32px 16px 80px; }
.intro { text-align: center; margin-bottom: 32px; }
.intro p { color: #78716c; }
.controls { background: #fff; border: 1px solid #fce7f3; border-radius: 24px; padding: 24px; max-width: 896px; margin: 0 auto 32px; }
.controls label { display: block; font-size: 12px; font-weight: bold; color: #78716c; margin: 12px 0 8px; }
.group { display: flex; flex-wrap: wrap; gap: 8px; align-items: center; margin-bottom: 8px; }
.group-label { font-size: 12px; font-weight: bold; color: #a8a29e; width: 96px; }
.char { border: 0; background: transparent; padding: 6px 12px; border-radius: 12px; font-weight: 600; color: #78716c; cursor: pointer; }
.char.selected { background: #fff; color: #ec4899; box-shadow: 0 0 0 2px #fce7f3; }
.scene-input { width: 100%; box-sizing: border-box; border: 2px solid #e7e5e4; border-radius: 12px; padding: 12px 16px; font-size: 16px; }
.presets { display: flex; flex-wrap: wrap; gap: 8px; margin-top: 12px; }
.preset { font-size: 12px; padding: 4px 12px; background: #fff; border: 1px solid #e7e5e4; border-radius: 999px; color: #78716c; cursor: pointer; }
.generate { width: 100%; height: 56px; margin-top: 16px; border: 0; border-radius: 16px; font-size: 18px; font-weight: bold; color: #fff; background: linear-gradient(90deg, #f472b6, #c084fc, #60a5fa); cursor: pointer; }
.generate:disabled { background: #d6d3d1; cursor: not-allowed; }
.error { background: #fef2f2; border-left: 4px solid #f87171; padding: 16px; margin: 0 auto 32px; max-width: 672px; border-radius: 0 12px 12px 0; color: #b91c1c; font-weight: bold; }
.results { display: grid; grid-template-columns: 2fr 1fr; gap: 32px; }
.stage { position: relative; background: #fff; padding: 12px; border-radius: 32px; }
.canvas { position: relative; aspect-ratio: 1 / 1; overflow: hidden; border-radius: 24px; background: #f5f5f4; }
.canvas img { width: 100%; height: 100%; object-fit: cover; display: block; }
.marker { position: absolute; z-index: 20; transform: translate(-50%, -50%); }
.marker:hover { z-index: 50; }
.dot { width: 12px; height: 12px; background: #fff; border: 2px solid #f472b6; border-radius: 50%; margin: 0 auto 4px; }
.bubble { background: rgba(255,255,255,.95); border: 1px solid #e7e5e4; border-radius: 8px; padding: 6px 8px; min-width: 100px; text-align: center; }
.bubble .en { font-weight: bold; font-size: 12px; }
.bubble .ko { color: #db2777; font-size: 10px; font-weight: bold; }
.bubble .zh { color: #78716c; font-size: 9px; }
.scene-label { position: absolute; top: 24px; left: 24px; background: rgba(0,0,0,.5); color: #fff; padding: 6px 16px; border-radius: 999px; font-weight: bold; font-size: 14px; }
.hint { text-align: center; color: #a8a29e; font-size: 14px; margin-top: 8px; }
.words { background: #fff; border-radius: 32px; padding: 24px; }
.word-list { display: grid; gap: 12px; max-height: 600px; overflow-y: auto; }
.word { border: 2px solid #f5f5f4; border-radius: 16px; padding: 16px; text-align: center; }
.word .num { font-size: 32px; font-weight: bold; color: #f9a8d4; }
.word .en { font-size: 20px; font-weight: bold; }
.word .ko { font-size: 18px; }
.word .zh { color: #78716c; }
.empty { text-align: center; padding: 48px 0; opacity: .4; }
.empty .icon { font-size: 72px; }
"#;

/// Render the whole page for the current state
pub fn render_page(state: &SessionState) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>吉伊卡哇单词卡</title>\n");
    let _ = write!(html, "<style>{}</style>\n</head>\n", STYLE);
    let _ = write!(
        html,
        "<body data-phase=\"{}\">\n",
        state.phase.as_str()
    );

    html.push_str("<header><h1>🎫 吉伊卡哇单词卡</h1><span class=\"badge\">🤖 Powered by Gemini 2.5</span></header>\n");
    html.push_str("<main>\n");
    html.push_str("<div class=\"intro\"><h2>设计你的专属单词卡</h2><p>选择你喜欢的角色（吉伊卡哇或鬼灭之刃Q版），输入任何场景！</p></div>\n");

    render_controls(&mut html, state);

    if let Some(error) = &state.error {
        let _ = writeln!(html, "<div class=\"error\">🥺 {}</div>", escape_html(error));
    }

    match &state.result {
        Some(result) => render_result(&mut html, result),
        None if !state.phase.is_loading() => {
            html.push_str("<div class=\"empty\"><div class=\"icon\">🎡</div><p>等待你的奇思妙想...</p></div>\n");
        }
        None => {}
    }

    html.push_str("</main>\n");
    html.push_str(PAGE_SCRIPT);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_controls(html: &mut String, state: &SessionState) {
    let loading = state.phase.is_loading();

    html.push_str("<section class=\"controls\">\n");
    html.push_str("<label>👤 选择角色 / Choose Character</label>\n");
    html.push_str("<form method=\"post\" action=\"/character\">\n");
    for group in CharacterGroup::ALL {
        let _ = write!(
            html,
            "<div class=\"group\"><span class=\"group-label\">{}:</span>",
            group.label()
        );
        for character in group.members() {
            let class = if character == state.character { "char selected" } else { "char" };
            let _ = write!(
                html,
                "<button class=\"{}\" name=\"character\" value=\"{}\">{}</button>",
                class,
                character.name(),
                character.name()
            );
        }
        html.push_str("</div>\n");
    }
    html.push_str("</form>\n");

    html.push_str("<label>🎨 自定义场景 / DIY Scene</label>\n");
    html.push_str("<form method=\"post\" action=\"/generate\">\n");
    let _ = writeln!(
        html,
        "<input class=\"scene-input\" type=\"text\" name=\"scene_prompt\" value=\"{}\" placeholder=\"例如：在摇滚演唱会唱歌，在海边冲浪...\"{}>",
        escape_html(state.scene_prompt.as_str()),
        if loading { " disabled" } else { "" }
    );

    let disabled = if state.can_start_generation() { "" } else { " disabled" };
    let label = match state.phase.caption() {
        Some(caption) => format!("⏳ {}", caption),
        None => "✨ 生成魔法单词卡".to_string(),
    };
    let _ = writeln!(
        html,
        "<button class=\"generate\" type=\"submit\"{}>{}</button>",
        disabled, label
    );
    html.push_str("</form>\n");

    html.push_str("<form method=\"post\" action=\"/scene/preset\" class=\"presets\">\n");
    for preset in ScenePreset::ALL {
        let _ = write!(
            html,
            "<button class=\"preset\" name=\"preset\" value=\"{}\">{}</button>",
            preset,
            preset.text()
        );
    }
    html.push_str("\n</form>\n</section>\n");
}

fn render_result(html: &mut String, result: &GenerationResult) {
    html.push_str("<section class=\"results\">\n<div>\n<div class=\"stage\">\n<div class=\"canvas\">\n");
    let _ = writeln!(
        html,
        "<img src=\"{}\" alt=\"Generated Scene\">",
        escape_html(&result.image_url)
    );

    for marker in annotation_markers(&result.vocabulary) {
        let item = &result.vocabulary[marker.index];
        let _ = writeln!(
            html,
            "<div class=\"marker\" style=\"top: {}%; left: {}%;\"><div class=\"dot\"></div><div class=\"bubble\"><div class=\"en\">{}</div><div class=\"ko\">{}</div><div class=\"zh\">{}</div></div></div>",
            marker.anchor.top_percent,
            marker.anchor.left_percent,
            escape_html(&item.english),
            escape_html(&item.korean),
            escape_html(&item.chinese)
        );
    }

    html.push_str("</div>\n");
    let _ = writeln!(
        html,
        "<div class=\"scene-label\">{}</div>",
        escape_html(result.scene_prompt.as_str())
    );
    html.push_str("</div>\n<div class=\"hint\">点击图片上的标签学习单词！</div>\n</div>\n");

    let _ = writeln!(
        html,
        "<div class=\"words\"><h3>📝 单词列表 ({})</h3><div class=\"word-list\">",
        result.vocabulary.len()
    );
    for (index, item) in result.vocabulary.iter().enumerate() {
        let _ = writeln!(
            html,
            "<div class=\"word\"><div class=\"num\">{}</div><div class=\"en\">{}</div><div class=\"ko\">{}</div><div class=\"zh\">{}</div></div>",
            index + 1,
            escape_html(&item.english),
            escape_html(&item.korean),
            escape_html(&item.chinese)
        );
    }
    html.push_str("</div></div>\n</section>\n");
}

/// Tracks the scene field for the generate button, and reloads when the
/// WebSocket reports a phase other than the rendered one
const PAGE_SCRIPT: &str = r#"<script>
(function () {
  var rendered = document.body.dataset.phase;
  var input = document.querySelector(".scene-input");
  var button = document.querySelector(".generate");
  if (input && button && !input.disabled) {
    input.addEventListener("input", function () {
      button.disabled = input.value.trim() === "";
    });
  }
  var scheme = location.protocol === "https:" ? "wss://" : "ws://";
  var socket = new WebSocket(scheme + location.host + "/ws");
  socket.onmessage = function (event) {
    var message = JSON.parse(event.data);
    if (message.type === "StateUpdated" && message.state.phase !== rendered) {
      location.reload();
    }
  };
})();
</script>
"#;

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::aggregates::{SessionEvent, GENERATION_FAILED_MESSAGE};
    use crate::domain::entities::{CharacterIdentity, GeneratedImage, VocabularyItem};
    use crate::domain::value_objects::{BoundingBox, GenerationId, ScenePrompt};

    fn completed_state() -> SessionState {
        let vocabulary = vec![
            VocabularyItem {
                english: "Parasol".to_string(),
                korean: "파라솔".to_string(),
                chinese: "遮阳伞".to_string(),
                box2d: BoundingBox::new(200, 400, 400, 600).ok(),
            },
            VocabularyItem {
                english: "Serenity <calm>".to_string(),
                korean: "평온".to_string(),
                chinese: "宁静".to_string(),
                box2d: None,
            },
        ];
        let result = GenerationResult::new(
            CharacterIdentity::Tanjiro,
            ScenePrompt::new("海滩"),
            GeneratedImage {
                mime_type: "image/png".to_string(),
                bytes: vec![0, 1, 2],
            },
            vocabulary,
        );
        let id = GenerationId::new();
        SessionState::default()
            .apply(SessionEvent::GenerationRequested(id))
            .apply(SessionEvent::GenerationSucceeded {
                generation_id: id,
                result: Arc::new(result),
            })
    }

    #[test]
    fn test_idle_page_shows_controls_and_empty_state() {
        let html = render_page(&SessionState::default());

        assert!(html.contains("data-phase=\"idle\""));
        assert!(html.contains("char selected\" name=\"character\" value=\"Chiikawa\""));
        assert!(html.contains("鬼灭之刃(Q版)"));
        assert!(html.contains("name=\"scene_prompt\" value=\"演唱会\""));
        assert!(html.contains("name=\"preset\" value=\"Beach\">海滩</button>"));
        assert!(html.contains("addEventListener(\"input\""));
        assert!(html.contains("✨ 生成魔法单词卡"));
        assert!(html.contains("等待你的奇思妙想"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_loading_page_disables_generate_and_shows_caption() {
        let state = SessionState::default().apply(SessionEvent::GenerationRequested(GenerationId::new()));
        let html = render_page(&state);

        assert!(html.contains("type=\"submit\" disabled"));
        assert!(html.contains("正在绘制场景..."));
        assert!(!html.contains("等待你的奇思妙想"));
    }

    #[test]
    fn test_blank_scene_disables_generate() {
        let state = SessionState::default().apply(SessionEvent::ScenePromptChanged(ScenePrompt::new(" ")));
        assert!(render_page(&state).contains("type=\"submit\" disabled"));
    }

    #[test]
    fn test_error_banner_is_rendered() {
        let id = GenerationId::new();
        let state = SessionState::default()
            .apply(SessionEvent::GenerationRequested(id))
            .apply(SessionEvent::GenerationFailed {
                generation_id: id,
                message: GENERATION_FAILED_MESSAGE.to_string(),
            });

        assert!(render_page(&state).contains(GENERATION_FAILED_MESSAGE));
    }

    #[test]
    fn test_result_page_places_markers_and_lists_every_word() {
        let html = render_page(&completed_state());

        assert!(html.contains("src=\"data:image/png;base64,AAEC\""));
        assert_eq!(html.matches("class=\"marker\"").count(), 1);
        assert!(html.contains("top: 30%; left: 50%;"));
        assert!(html.contains("单词列表 (2)"));
        assert!(html.contains("<div class=\"num\">2</div><div class=\"en\">Serenity &lt;calm&gt;</div>"));
        assert!(html.contains("<div class=\"scene-label\">海滩</div>"));
    }

    #[test]
    fn test_scene_with_quotes_stays_inside_value_attribute() {
        let state = SessionState::default()
            .apply(SessionEvent::ScenePromptChanged(ScenePrompt::new(r#"a "rock" <show>"#)));
        let html = render_page(&state);

        assert!(html.contains(r#"value="a &quot;rock&quot; &lt;show&gt;" placeholder="#));
        assert!(!html.contains(r#""rock""#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    }
}
