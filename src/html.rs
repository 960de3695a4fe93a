use crate::config::LayoutConfig;
use crate::highlight::{self, TokenKind};
use crate::ir::{Block, Callout, CalloutKind, CodeBlock, CommandBlock, Page, PageLink};
use crate::layout::compute_layout;
use crate::render::diagram_svg;
use crate::theme::Theme;
use std::fmt::Write;

/// Renders a page as a standalone HTML document: theme-derived CSS in the
/// head, sections in declaration order, diagrams inlined as SVG.
pub fn render_page(page: &Page, theme: &Theme, config: &LayoutConfig) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = write!(out, "<title>{}</title>\n", escape_html(&page.title));
    let _ = write!(out, "<style>{}</style>\n", stylesheet(theme));
    out.push_str("</head>\n<body>\n<main>\n");

    let _ = write!(out, "<h1>{}</h1>\n", escape_html(&page.title));
    if let Some(intro) = &page.intro {
        let _ = write!(out, "<p class=\"intro\">{}</p>\n", escape_html(intro));
    }

    for section in &page.sections {
        out.push_str("<section>\n");
        let _ = write!(out, "<h2>{}</h2>\n", escape_html(&section.title));
        for block in &section.blocks {
            match block {
                Block::Prose(text) => push_prose(&mut out, text),
                Block::Callout(callout) => push_callout(&mut out, callout),
                Block::Code(code) => push_code(&mut out, code),
                Block::Command(command) => push_command(&mut out, command),
                Block::Links(links) => push_links(&mut out, links),
                Block::Diagram(diagram) => {
                    let layout = compute_layout(diagram, theme, config);
                    let _ = write!(
                        out,
                        "<figure class=\"diagram\">{}</figure>\n",
                        diagram_svg(&layout, theme, config)
                    );
                }
            }
        }
        out.push_str("</section>\n");
    }

    out.push_str("</main>\n");
    out.push_str(COPY_SCRIPT);
    out.push_str("</body>\n</html>\n");
    out
}

fn push_prose(out: &mut String, text: &str) {
    for paragraph in text.split("\n\n").filter(|p| !p.trim().is_empty()) {
        let _ = write!(out, "<p>{}</p>\n", escape_html(paragraph.trim()));
    }
}

fn push_callout(out: &mut String, callout: &Callout) {
    let class = match callout.kind {
        CalloutKind::Note => "note",
        CalloutKind::Tip => "tip",
        CalloutKind::Warning => "warning",
    };
    let _ = write!(
        out,
        "<aside class=\"callout {class}\">{}<p>{}</p></aside>\n",
        callout_glyph(callout.kind),
        escape_html(&callout.text)
    );
}

fn push_code(out: &mut String, code: &CodeBlock) {
    out.push_str("<figure class=\"code-block\">");
    if let Some(filename) = &code.filename {
        let _ = write!(
            out,
            "<figcaption class=\"filename\">{}</figcaption>",
            escape_html(filename)
        );
    }
    let _ = write!(
        out,
        "<pre><code class=\"language-{}\">",
        escape_attr(&code.language)
    );
    // Highlight tokens partition the source, so the emitted text content is
    // the code string unchanged.
    for token in highlight::highlight(&code.language, &code.code) {
        match token.kind {
            TokenKind::Text => out.push_str(&escape_html(token.text)),
            kind => {
                let _ = write!(
                    out,
                    "<span class=\"{}\">{}</span>",
                    token_class(kind),
                    escape_html(token.text)
                );
            }
        }
    }
    out.push_str("</code></pre></figure>\n");
}

fn push_command(out: &mut String, command: &CommandBlock) {
    // The prompt glyph is decoration; the copyable value is the exact
    // command string, carried in data-copy.
    let _ = write!(
        out,
        "<div class=\"command-block\"><span class=\"prompt\" aria-hidden=\"true\">$</span><code>{}</code><button type=\"button\" class=\"copy\" data-copy=\"{}\">Copy</button></div>\n",
        escape_html(&command.command),
        escape_attr(&command.command)
    );
}

fn push_links(out: &mut String, links: &[PageLink]) {
    out.push_str("<ul class=\"related\">");
    for link in links {
        let _ = write!(
            out,
            "<li><a href=\"{}\">{}</a></li>",
            escape_attr(&link.href),
            escape_html(&link.label)
        );
    }
    out.push_str("</ul>\n");
}

fn token_class(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Keyword => "tok-kw",
        TokenKind::Builtin => "tok-builtin",
        TokenKind::Str => "tok-str",
        TokenKind::Number => "tok-num",
        TokenKind::Comment => "tok-comment",
        TokenKind::Text => "",
    }
}

/// 16px inline glyphs standing in for the icon library the original pages
/// pull these from.
fn callout_glyph(kind: CalloutKind) -> &'static str {
    match kind {
        CalloutKind::Note => {
            "<svg class=\"glyph\" viewBox=\"0 0 16 16\" width=\"16\" height=\"16\" aria-hidden=\"true\"><circle cx=\"8\" cy=\"8\" r=\"7\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"1.5\"/><path d=\"M8 7v4M8 4.5v.5\" stroke=\"currentColor\" stroke-width=\"1.5\" stroke-linecap=\"round\"/></svg>"
        }
        CalloutKind::Tip => {
            "<svg class=\"glyph\" viewBox=\"0 0 16 16\" width=\"16\" height=\"16\" aria-hidden=\"true\"><circle cx=\"8\" cy=\"8\" r=\"7\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"1.5\"/><path d=\"M5 8.2 7 10.2 11 6\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"1.5\" stroke-linecap=\"round\"/></svg>"
        }
        CalloutKind::Warning => {
            "<svg class=\"glyph\" viewBox=\"0 0 16 16\" width=\"16\" height=\"16\" aria-hidden=\"true\"><path d=\"M8 1.5 15 14H1z\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"1.5\" stroke-linejoin=\"round\"/><path d=\"M8 6v4M8 11.5v.5\" stroke=\"currentColor\" stroke-width=\"1.5\" stroke-linecap=\"round\"/></svg>"
        }
    }
}

fn stylesheet(theme: &Theme) -> String {
    let note = theme.callout_palette(CalloutKind::Note);
    let tip = theme.callout_palette(CalloutKind::Tip);
    let warn = theme.callout_palette(CalloutKind::Warning);
    format!(
        "body{{margin:0;background:{bg};color:{text};font-family:{font};font-size:{size}px;line-height:1.65}}\
main{{max-width:860px;margin:0 auto;padding:40px 24px}}\
h1{{color:{heading};font-size:2em;margin:0 0 .4em}}\
h2{{color:{heading};font-size:1.35em;margin:1.8em 0 .6em;border-bottom:1px solid {rule};padding-bottom:.3em}}\
p.intro{{color:{muted};font-size:1.08em}}\
a{{color:{link}}}\
.callout{{display:flex;gap:10px;align-items:flex-start;border-radius:8px;padding:12px 14px;margin:14px 0;border-left:4px solid}}\
.callout p{{margin:0}}\
.callout .glyph{{flex:none;margin-top:3px}}\
.callout.note{{background:{note_bg};border-color:{note_border};color:{text}}}\
.callout.note .glyph{{color:{note_icon}}}\
.callout.tip{{background:{tip_bg};border-color:{tip_border}}}\
.callout.tip .glyph{{color:{tip_icon}}}\
.callout.warning{{background:{warn_bg};border-color:{warn_border}}}\
.callout.warning .glyph{{color:{warn_icon}}}\
.code-block{{margin:16px 0;border-radius:10px;overflow:hidden;background:{code_bg}}}\
.code-block .filename{{background:{code_file_bg};color:{code_text};font-family:{mono};font-size:{code_size}px;padding:8px 14px;opacity:.85}}\
.code-block pre{{margin:0;padding:14px;overflow-x:auto}}\
.code-block code{{font-family:{mono};font-size:{code_size}px;color:{code_text}}}\
.tok-kw{{color:{hl_kw}}}.tok-builtin{{color:{hl_builtin}}}.tok-str{{color:{hl_str}}}.tok-num{{color:{hl_num}}}.tok-comment{{color:{hl_comment};font-style:italic}}\
.command-block{{display:flex;align-items:center;gap:10px;background:{cmd_bg};color:{cmd_text};border-radius:8px;padding:10px 14px;margin:14px 0;font-family:{mono};font-size:{code_size}px}}\
.command-block .prompt{{color:{prompt};user-select:none}}\
.command-block code{{flex:1}}\
.command-block .copy{{background:none;border:1px solid {rule};color:{cmd_text};border-radius:6px;padding:3px 10px;cursor:pointer;font-size:.85em}}\
.diagram{{margin:18px 0;text-align:center}}\
.related{{list-style:none;padding:0}}\
.related li{{margin:4px 0}}",
        bg = theme.background,
        text = theme.text_color,
        font = theme.font_family,
        size = theme.font_size,
        heading = theme.heading_color,
        rule = theme.rule_color,
        muted = theme.muted_text_color,
        link = theme.link_color,
        note_bg = note.background,
        note_border = note.border,
        note_icon = note.icon,
        tip_bg = tip.background,
        tip_border = tip.border,
        tip_icon = tip.icon,
        warn_bg = warn.background,
        warn_border = warn.border,
        warn_icon = warn.icon,
        code_bg = theme.code_background,
        code_file_bg = theme.code_filename_background,
        code_text = theme.code_text_color,
        code_size = theme.code_font_size,
        mono = theme.mono_font_family,
        hl_kw = theme.highlight_keyword,
        hl_builtin = theme.highlight_builtin,
        hl_str = theme.highlight_string,
        hl_num = theme.highlight_number,
        hl_comment = theme.highlight_comment,
        cmd_bg = theme.command_background,
        cmd_text = theme.command_text_color,
        prompt = theme.prompt_color,
    )
}

const COPY_SCRIPT: &str = "<script>document.querySelectorAll('.copy').forEach(function(btn){btn.addEventListener('click',function(){navigator.clipboard.writeText(btn.dataset.copy);});});</script>\n";

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(input: &str) -> String {
    escape_html(input).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Connection, Diagram, DiagramNode, Direction, NodeColor, Section};

    fn page_with(blocks: Vec<Block>) -> Page {
        Page {
            title: "Azure Storage".to_string(),
            intro: None,
            sections: vec![Section {
                title: "Provisioning".to_string(),
                blocks,
            }],
        }
    }

    fn render(blocks: Vec<Block>) -> String {
        render_page(&page_with(blocks), &Theme::light(), &LayoutConfig::default())
    }

    /// Inverse of the code-block emission: drop tags, undo entity escaping.
    fn visible_text(html: &str) -> String {
        let mut out = String::new();
        let mut in_tag = false;
        for ch in html.chars() {
            match ch {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => out.push(ch),
                _ => {}
            }
        }
        out.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
    }

    #[test]
    fn section_title_and_order() {
        let html = render(vec![
            Block::Prose("First paragraph.".to_string()),
            Block::Prose("Second paragraph.".to_string()),
        ]);
        assert!(html.contains("<h2>Provisioning</h2>"));
        let first = html.find("First paragraph.").unwrap();
        let second = html.find("Second paragraph.").unwrap();
        assert!(first < second);
    }

    #[test]
    fn code_block_round_trips_exactly() {
        let code = "resource \"x\" \"y\" {\n  count = 1 # <- keep\n}\n";
        let html = render(vec![Block::Code(CodeBlock {
            language: "hcl".to_string(),
            filename: Some("main.tf".to_string()),
            code: code.to_string(),
        })]);
        assert!(html.contains("main.tf"));
        let start = html.find("<code class=\"language-hcl\">").unwrap();
        let end = html[start..].find("</code>").unwrap() + start;
        assert_eq!(visible_text(&html[start..end]), code);
    }

    #[test]
    fn unknown_language_renders_without_spans() {
        let html = render(vec![Block::Code(CodeBlock {
            language: "cobol".to_string(),
            filename: None,
            code: "MOVE A TO B.".to_string(),
        })]);
        let start = html.find("<code class=\"language-cobol\">").unwrap();
        let end = html[start..].find("</code>").unwrap() + start;
        assert!(!html[start..end].contains("<span"));
        assert!(html.contains("MOVE A TO B."));
    }

    #[test]
    fn command_copy_value_is_exact() {
        let html = render(vec![Block::Command(CommandBlock {
            command: "terraform apply".to_string(),
        })]);
        assert!(html.contains("data-copy=\"terraform apply\""));
        assert!(html.contains("<code>terraform apply</code>"));
    }

    #[test]
    fn command_with_quotes_escapes_the_attribute() {
        let html = render(vec![Block::Command(CommandBlock {
            command: "az group create --name \"rg-demo\"".to_string(),
        })]);
        assert!(html.contains("data-copy=\"az group create --name &quot;rg-demo&quot;\""));
    }

    #[test]
    fn diagram_is_inlined_as_svg() {
        let html = render(vec![Block::Diagram(Diagram {
            title: "Hierarchy".to_string(),
            direction: Direction::Vertical,
            nodes: vec![
                DiagramNode {
                    id: "a".to_string(),
                    label: "A".to_string(),
                    sublabel: None,
                    color: NodeColor::Blue,
                },
                DiagramNode {
                    id: "b".to_string(),
                    label: "B".to_string(),
                    sublabel: None,
                    color: NodeColor::Gray,
                },
            ],
            connections: vec![Connection {
                from: "a".to_string(),
                to: "b".to_string(),
                label: Some("Contains".to_string()),
                dashed: true,
            }],
        })]);
        assert!(html.contains("<figure class=\"diagram\"><svg"));
        assert!(html.contains("Contains"));
    }

    #[test]
    fn callout_carries_glyph_and_text() {
        let html = render(vec![Block::Callout(Callout {
            kind: CalloutKind::Warning,
            text: "State files may contain secrets.".to_string(),
        })]);
        assert!(html.contains("callout warning"));
        assert!(html.contains("<svg class=\"glyph\""));
        assert!(html.contains("State files may contain secrets."));
    }

    #[test]
    fn stylesheet_carries_every_callout_palette() {
        let theme = Theme::slate();
        let html = render_page(&page_with(Vec::new()), &theme, &LayoutConfig::default());
        for palette in [&theme.callout_note, &theme.callout_tip, &theme.callout_warning] {
            assert!(html.contains(&palette.background));
            assert!(html.contains(&palette.border));
            assert!(html.contains(&palette.icon));
        }
    }

    #[test]
    fn links_render_as_anchors() {
        let html = render(vec![Block::Links(vec![PageLink {
            label: "Terraform state".to_string(),
            href: "/state".to_string(),
        }])]);
        assert!(html.contains("<a href=\"/state\">Terraform state</a>"));
    }
}
