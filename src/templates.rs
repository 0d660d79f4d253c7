use askama::Template;
use crate::color::Color;
use crate::palette::SchemeKind;

pub struct SchemeButton {
    pub name: &'static str,
    pub class: &'static str,
}

impl SchemeButton {
    pub fn all(active: Option<SchemeKind>) -> Vec<SchemeButton> {
        SchemeKind::ALL
            .into_iter()
            .map(|kind| SchemeButton {
                name: kind.name(),
                class: if Some(kind) == active { "scheme-btn active" } else { "scheme-btn" },
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub current: &'a Color,
    pub palette: &'a [Color],
    pub history: &'a [String],
    pub scheme_buttons: Vec<SchemeButton>,
    pub body_class: &'static str,
    pub gradient_duration_ms: u64,
    pub notification_duration_ms: u64,
}
