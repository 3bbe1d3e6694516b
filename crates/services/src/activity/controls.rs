use std::fmt;

use serde::Serialize;

use shapeville_core::model::ItemId;

/// A user-facing control of an activity page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Start,
    Submit,
    ChooseAngle,
    Reveal,
    Next,
    Back,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Control::Start => "start",
            Control::Submit => "submit",
            Control::ChooseAngle => "choose angle",
            Control::Reveal => "reveal",
            Control::Next => "next",
            Control::Back => "back",
        };
        f.write_str(name)
    }
}

/// A selectable item (figure, family, measure) and whether it may be picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemChoice {
    pub item: ItemId,
    pub enabled: bool,
}

/// Which controls the renderer should enable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnabledControls {
    pub start: bool,
    pub submit: bool,
    pub choose_angle: bool,
    pub reveal: bool,
    pub next: bool,
    pub back: bool,
    pub items: Vec<ItemChoice>,
}

impl EnabledControls {
    #[must_use]
    pub fn allows(&self, control: Control) -> bool {
        match control {
            Control::Start => self.start,
            Control::Submit => self.submit,
            Control::ChooseAngle => self.choose_angle,
            Control::Reveal => self.reveal,
            Control::Next => self.next,
            Control::Back => self.back,
        }
    }
}
