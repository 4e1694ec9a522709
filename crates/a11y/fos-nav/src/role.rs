//! Node roles
//!
//! The subset of ARIA/platform roles navigation and output care about.

/// Accessibility role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AriaRole {
    // === Document ===
    RootWebArea,
    Iframe,
    #[default]
    Generic,
    StaticText,
    LineBreak,
    Paragraph,
    Heading,
    Img,
    List,
    ListItem,
    Table,
    Row,
    Cell,
    Group,

    // === Landmarks ===
    Banner,
    Complementary,
    ContentInfo,
    Form,
    Main,
    Navigation,
    Region,
    Search,

    // === Widgets ===
    Button,
    Checkbox,
    Combobox,
    Link,
    Listbox,
    Radio,
    SearchBox,
    Slider,
    TextBox,

    // === Windows / live ===
    Alert,
    Dialog,
}

impl AriaRole {
    /// Parse from a role string
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_lowercase().as_str() {
            "rootwebarea" | "document" => Self::RootWebArea,
            "iframe" => Self::Iframe,
            "generic" | "none" | "presentation" => Self::Generic,
            "statictext" => Self::StaticText,
            "linebreak" => Self::LineBreak,
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading,
            "img" => Self::Img,
            "list" => Self::List,
            "listitem" => Self::ListItem,
            "table" => Self::Table,
            "row" => Self::Row,
            "cell" => Self::Cell,
            "group" => Self::Group,

            "banner" => Self::Banner,
            "complementary" => Self::Complementary,
            "contentinfo" => Self::ContentInfo,
            "form" => Self::Form,
            "main" => Self::Main,
            "navigation" => Self::Navigation,
            "region" => Self::Region,
            "search" => Self::Search,

            "button" => Self::Button,
            "checkbox" => Self::Checkbox,
            "combobox" => Self::Combobox,
            "link" => Self::Link,
            "listbox" => Self::Listbox,
            "radio" => Self::Radio,
            "searchbox" => Self::SearchBox,
            "slider" => Self::Slider,
            "textbox" => Self::TextBox,

            "alert" => Self::Alert,
            "dialog" => Self::Dialog,

            _ => return None,
        })
    }

    /// Check if role is widget (interactive)
    pub fn is_widget(&self) -> bool {
        matches!(self,
            Self::Button | Self::Checkbox | Self::Combobox | Self::Link |
            Self::Listbox | Self::Radio | Self::SearchBox | Self::Slider | Self::TextBox
        )
    }

    /// Check if role is landmark
    pub fn is_landmark(&self) -> bool {
        matches!(self,
            Self::Banner | Self::Complementary | Self::ContentInfo |
            Self::Form | Self::Main | Self::Navigation | Self::Region | Self::Search
        )
    }

    /// Controls that take part in form navigation
    pub fn is_form_field(&self) -> bool {
        matches!(self,
            Self::Button | Self::Checkbox | Self::Combobox | Self::Listbox |
            Self::Radio | Self::SearchBox | Self::Slider | Self::TextBox
        )
    }

    /// Content lives in a separate embedded document
    pub fn is_frame(&self) -> bool {
        matches!(self, Self::Iframe)
    }

    /// Word spoken after the node's text, if any
    pub fn spoken_name(&self) -> Option<&'static str> {
        Some(match self {
            Self::Heading => "heading",
            Self::Img => "image",
            Self::List => "list",
            Self::ListItem => "list item",
            Self::Table => "table",
            Self::Iframe => "frame",
            Self::Banner => "banner",
            Self::Complementary => "complementary",
            Self::ContentInfo => "content info",
            Self::Form => "form",
            Self::Main => "main",
            Self::Navigation => "navigation",
            Self::Region => "region",
            Self::Search => "search",
            Self::Button => "button",
            Self::Checkbox => "check box",
            Self::Combobox => "combo box",
            Self::Link => "link",
            Self::Listbox => "list box",
            Self::Radio => "radio button",
            Self::SearchBox => "search box",
            Self::Slider => "slider",
            Self::TextBox => "edit text",
            Self::Alert => "alert",
            Self::Dialog => "dialog",
            _ => return None,
        })
    }
}
