//! View model for the record toggle button.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use crate::ccc;

const BASE_CLASS: &str = "ScreenRecorderButton";
const RECORDING_CLASS: &str = "isRecording";

// The `.html` name turns on minijinja's HTML auto-escaping.
const TEMPLATE_NAME: &str = "button.html";
const TEMPLATE: &str =
    r#"<button title="{{ title }}" class="{{ class_name }}"><i aria-hidden="true">{{ glyph }}</i></button>"#;

/// What a click on the button should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Start,
    Stop,
}

/// Everything needed to draw the toggle button for one recording state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub title: &'static str,
    pub glyph: char,
    pub class_name: String,
    action: ButtonAction,
}

impl ButtonView {
    pub fn for_state(is_recording: bool) -> Self {
        let (title, glyph, action) = if is_recording {
            ("Stop Recording", '⏹', ButtonAction::Stop)
        } else {
            ("Start Recording", '⏵', ButtonAction::Start)
        };
        Self {
            title,
            glyph,
            class_name: ccc!(BASE_CLASS, is_recording.then_some(RECORDING_CLASS)),
            action,
        }
    }

    pub fn action(&self) -> ButtonAction {
        self.action
    }

    /// Render as a `<button>` element. The glyph is hidden from assistive tech;
    /// the title carries the accessible label.
    pub fn to_html(&self) -> Result<String> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)
            .context("parse button template")?;
        let template = env.get_template(TEMPLATE_NAME)?;
        let rendered = template
            .render(context! {
                title => self.title,
                class_name => &self.class_name,
                glyph => self.glyph,
            })
            .context("render button")?;
        Ok(rendered)
    }
}
