//! Static vocabularies used by the suggestion heuristics

/// Html tag names treated as real tags rather than typed prose
pub const HTML_TAGS: &[&str] = &[
    "body", "head", "html", "address", "blockquote", "dd", "div", "section", "article", "aside",
    "header", "footer", "nav", "menu", "dl", "dt", "fieldset", "form", "frame", "frameset", "h1",
    "h2", "h3", "h4", "h5", "h6", "iframe", "noframes", "object", "ol", "p", "ul", "applet",
    "center", "dir", "hr", "pre", "a", "abbr", "acronym", "area", "b", "base", "basefont", "bdo",
    "big", "br", "button", "caption", "cite", "code", "col", "colgroup", "del", "dfn", "em",
    "font", "i", "img", "input", "ins", "isindex", "kbd", "label", "legend", "li", "link", "map",
    "meta", "noscript", "optgroup", "option", "param", "q", "s", "samp", "script", "select",
    "small", "span", "strike", "strong", "style", "sub", "sup", "table", "tbody", "td",
    "textarea", "tfoot", "th", "thead", "title", "tr", "tt", "u", "var", "canvas", "main",
    "figure", "plaintext",
];

/// Tags offered as prefix completions; html tags plus `lorem`
pub fn commonly_used_tags() -> impl Iterator<Item = &'static str> {
    HTML_TAGS.iter().copied().chain(std::iter::once("lorem"))
}

pub fn is_html_tag(name: &str) -> bool {
    HTML_TAGS.contains(&name)
}

pub fn is_commonly_used_tag(name: &str) -> bool {
    name == "lorem" || is_html_tag(name)
}

/// Css property names; long abbreviations that prefix one of these are
/// treated as the user typing the property itself
pub const CSS_PROPERTIES: &[&str] = &[
    "align-content", "align-items", "align-self", "animation", "animation-delay",
    "animation-direction", "animation-duration", "animation-fill-mode",
    "animation-iteration-count", "animation-name", "animation-play-state",
    "animation-timing-function", "appearance", "backface-visibility", "background",
    "background-attachment", "background-clip", "background-color", "background-image",
    "background-origin", "background-position", "background-repeat", "background-size",
    "border", "border-bottom", "border-bottom-color", "border-bottom-left-radius",
    "border-bottom-right-radius", "border-bottom-style", "border-bottom-width",
    "border-collapse", "border-color", "border-image", "border-left", "border-left-color",
    "border-left-style", "border-left-width", "border-radius", "border-right",
    "border-right-color", "border-right-style", "border-right-width", "border-spacing",
    "border-style", "border-top", "border-top-color", "border-top-left-radius",
    "border-top-right-radius", "border-top-style", "border-top-width", "border-width", "bottom",
    "box-shadow", "box-sizing", "caption-side", "clear", "clip", "clip-path", "color",
    "column-count", "column-gap", "columns", "content", "counter-increment", "counter-reset",
    "cursor", "direction", "display", "empty-cells", "filter", "flex", "flex-basis",
    "flex-direction", "flex-flow", "flex-grow", "flex-shrink", "flex-wrap", "float", "font",
    "font-family", "font-feature-settings", "font-size", "font-style", "font-variant",
    "font-weight", "gap", "grid", "grid-area", "grid-auto-columns", "grid-auto-flow",
    "grid-auto-rows", "grid-column", "grid-gap", "grid-row", "grid-template",
    "grid-template-areas", "grid-template-columns", "grid-template-rows", "height", "hyphens",
    "justify-content", "justify-items", "justify-self", "left", "letter-spacing", "line-height",
    "list-style", "list-style-image", "list-style-position", "list-style-type", "margin",
    "margin-bottom", "margin-left", "margin-right", "margin-top", "max-height", "max-width",
    "min-height", "min-width", "object-fit", "object-position", "opacity", "order", "orphans",
    "outline", "outline-color", "outline-offset", "outline-style", "outline-width", "overflow",
    "overflow-wrap", "overflow-x", "overflow-y", "padding", "padding-bottom", "padding-left",
    "padding-right", "padding-top", "page-break-after", "page-break-before", "perspective",
    "place-content", "place-items", "pointer-events", "position", "quotes", "resize", "right",
    "row-gap", "tab-size", "table-layout", "text-align", "text-decoration", "text-indent",
    "text-overflow", "text-shadow", "text-transform", "top", "transform", "transform-origin",
    "transition", "transition-delay", "transition-duration", "transition-property",
    "transition-timing-function", "unicode-bidi", "user-select", "vertical-align", "visibility",
    "white-space", "widows", "width", "will-change", "word-break", "word-spacing", "word-wrap",
    "writing-mode", "z-index",
];

pub fn prefixes_css_property(abbreviation: &str) -> bool {
    CSS_PROPERTIES.iter().any(|p| p.starts_with(abbreviation))
}
