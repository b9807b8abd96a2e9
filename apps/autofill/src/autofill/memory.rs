//! In-memory `Document` built from an HTML string.
//!
//! Only form controls are kept. Every mutation the engine performs is
//! appended to a journal so callers can inspect exactly what happened and in
//! which order.
#![allow(dead_code)]

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::autofill::document::{
    AttachedFile, Control, ControlId, ControlTag, Document, DomEvent, SelectOption,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    ValueSet {
        control: ControlId,
        value: String,
    },
    FilesAttached {
        control: ControlId,
        files: Vec<AttachedFile>,
    },
    EventDispatched {
        control: ControlId,
        event: DomEvent,
    },
}

impl Mutation {
    pub fn control(&self) -> ControlId {
        match self {
            Mutation::ValueSet { control, .. }
            | Mutation::FilesAttached { control, .. }
            | Mutation::EventDispatched { control, .. } => *control,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    controls: Vec<Control>,
    files: HashMap<ControlId, Vec<AttachedFile>>,
    journal: Vec<Mutation>,
}

impl MemoryDocument {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let controls_selector =
            Selector::parse("input, textarea, select").expect("control selector");
        let option_selector = Selector::parse("option").expect("option selector");

        let controls = document
            .select(&controls_selector)
            .enumerate()
            .filter_map(|(idx, element)| read_control(ControlId(idx), element, &option_selector))
            .collect();

        Self {
            controls,
            ..Self::default()
        }
    }

    /// First control whose `name` (or, failing that, `id`) equals `key`.
    pub fn find(&self, key: &str) -> Option<&Control> {
        self.controls
            .iter()
            .find(|c| c.name.as_deref() == Some(key))
            .or_else(|| self.controls.iter().find(|c| c.dom_id.as_deref() == Some(key)))
    }

    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.find(key).map(|c| c.value.as_str())
    }

    pub fn files(&self, id: ControlId) -> &[AttachedFile] {
        self.files.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    pub fn take_journal(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    /// Journal entries touching one control, in order.
    pub fn journal_for(&self, id: ControlId) -> Vec<&Mutation> {
        self.journal.iter().filter(|m| m.control() == id).collect()
    }

    /// Wipes a value the way a re-rendering host page would: no journal entry.
    pub fn clear_value(&mut self, id: ControlId) {
        if let Some(control) = self.controls.get_mut(id.0) {
            control.value.clear();
        }
    }
}

impl Document for MemoryDocument {
    fn controls(&self) -> Vec<Control> {
        self.controls.clone()
    }

    fn set_value(&mut self, id: ControlId, value: &str) {
        let Some(control) = self.controls.get_mut(id.0) else {
            return;
        };
        control.value = value.to_string();
        self.journal.push(Mutation::ValueSet {
            control: id,
            value: value.to_string(),
        });
    }

    fn attach_files(&mut self, id: ControlId, files: Vec<AttachedFile>) {
        if id.0 >= self.controls.len() {
            return;
        }
        self.files.insert(id, files.clone());
        self.journal.push(Mutation::FilesAttached { control: id, files });
    }

    fn dispatch(&mut self, id: ControlId, event: DomEvent) {
        if id.0 >= self.controls.len() {
            return;
        }
        self.journal.push(Mutation::EventDispatched { control: id, event });
    }
}

fn read_control(id: ControlId, element: ElementRef<'_>, options: &Selector) -> Option<Control> {
    let el = element.value();
    let tag = match el.name() {
        "input" => ControlTag::Input,
        "textarea" => ControlTag::Textarea,
        "select" => ControlTag::Select,
        _ => return None,
    };
    let attr = |name: &str| el.attr(name).map(str::to_string);

    let (value, select_options) = match tag {
        ControlTag::Input => (attr("value").unwrap_or_default(), Vec::new()),
        ControlTag::Textarea => (element.text().collect::<String>(), Vec::new()),
        ControlTag::Select => {
            let mut selected = None;
            let opts: Vec<SelectOption> = element
                .select(options)
                .map(|option| {
                    let text = option.text().collect::<String>().trim().to_string();
                    let value = option.value().attr("value").map(str::to_string);
                    let opt = SelectOption {
                        value: value.unwrap_or_else(|| text.clone()),
                        text,
                    };
                    if selected.is_none() && option.value().attr("selected").is_some() {
                        selected = Some(opt.value.clone());
                    }
                    opt
                })
                .collect();
            let value = selected
                .or_else(|| opts.first().map(|o| o.value.clone()))
                .unwrap_or_default();
            (value, opts)
        }
    };

    Some(Control {
        id,
        tag,
        input_type: match tag {
            ControlTag::Input => el.attr("type").map(|t| t.to_ascii_lowercase()),
            _ => None,
        },
        name: attr("name"),
        dom_id: attr("id"),
        role: attr("role"),
        value,
        options: select_options,
    })
}
