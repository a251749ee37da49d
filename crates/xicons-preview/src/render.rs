//
// render.rs
//
// CSS-style payload for the inline icon decoration
//

/// Opaque style descriptor handed to the host's decoration primitive.
///
/// The image is injected as an inline-block `before` pseudo-element sized to
/// the surrounding text; the dark variant inverts the glyph so monochrome
/// SVGs stay visible on dark themes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSpec {
    /// `text-decoration` payload for the default (light) theme
    pub before_style: String,
    /// Additional `text-decoration` payload applied on dark themes
    pub dark_before_style: String,
}

/// Build the render spec for an icon image data URL.
pub fn make_decoration_render(image_url: &str) -> RenderSpec {
    RenderSpec {
        before_style: style(&[
            ("width", "1.2em"),
            ("height", "1.4em"),
            ("display", "inline-block"),
            ("background-image", &format!("url({image_url})")),
            ("background-position", "center 4px"),
            ("background-repeat", "no-repeat"),
            ("background-size", "1.2em"),
            ("margin-right", "4px"),
            ("opacity", "0.4"),
        ]),
        dark_before_style: style(&[("filter", "invert(100%)")]),
    }
}

/// Serialize properties into a `text-decoration` abuse string: the leading
/// `none;` terminates the real text-decoration value, the rest smuggles
/// arbitrary CSS into the pseudo-element.
fn style(properties: &[(&str, &str)]) -> String {
    let mut out = String::from("none;");
    for (name, value) in properties {
        out.push_str(name);
        out.push(':');
        out.push_str(value);
        out.push(';');
    }
    out
}
