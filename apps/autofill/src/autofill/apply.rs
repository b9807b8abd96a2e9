//! Applies a `FillPlan` to a `Document`.
//!
//! Every function here is synchronous and best-effort: a control that is not
//! on the page is skipped without complaint.

use serde::Serialize;
use tracing::debug;

use crate::autofill::document::{AttachedFile, Control, ControlTag, Document, DomEvent};
use crate::autofill::plan::{FillInstruction, FillPlan};
use crate::models::ResumeAttachment;

/// MIME type given to the attached resume regardless of what the caller sent.
pub const RESUME_MIME: &str = "application/pdf";

/// Substrings (case-sensitive) that mark a file input as a resume upload.
const RESUME_INPUT_MARKERS: &[&str] = &["resume", "file"];

/// Substring of the `name` attribute that marks a per-skill input.
const SKILL_INPUT_MARKER: &str = "skill";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub text_fields: usize,
    pub select_fields: usize,
    pub skill_fields: usize,
}

impl PassSummary {
    pub fn total(&self) -> usize {
        self.text_fields + self.select_fields + self.skill_fields
    }
}

/// One full population pass: every plan instruction, then the skills pass.
pub fn populate<D: Document + ?Sized>(document: &mut D, plan: &FillPlan) -> PassSummary {
    let controls = document.controls();
    let mut summary = PassSummary::default();

    for instruction in &plan.instructions {
        set_field_value(document, &controls, instruction, &mut summary);
    }
    summary.skill_fields = fill_skills(document, &controls, &plan.skills);

    summary
}

/// Writes one instruction into every control whose `name` or `id` equals one
/// of its candidates.
pub fn set_field_value<D: Document + ?Sized>(
    document: &mut D,
    controls: &[Control],
    instruction: &FillInstruction,
    summary: &mut PassSummary,
) {
    let value = instruction.value.render();
    let mut touched = Vec::new();

    for candidate in instruction.candidates {
        for control in controls.iter().filter(|c| c.matches_name_or_id(candidate)) {
            if touched.contains(&control.id) {
                continue;
            }

            let filled = if control.tag == ControlTag::Select {
                let ok = select_option(document, control, &value);
                summary.select_fields += usize::from(ok);
                ok
            } else if control.is_text_like() {
                type_text(document, control, &value);
                summary.text_fields += 1;
                true
            } else {
                false
            };

            if filled {
                touched.push(control.id);
            }
        }
    }

    if !touched.is_empty() {
        debug!(
            "Filled {:?} into {} control(s)",
            instruction.field,
            touched.len()
        );
    }
}

/// Value assignment followed by `input` and `change`, plus Enter for comboboxes.
fn type_text<D: Document + ?Sized>(document: &mut D, control: &Control, value: &str) {
    document.set_value(control.id, value);
    document.dispatch(control.id, DomEvent::Input);
    document.dispatch(control.id, DomEvent::Change);
    if control.is_combobox() {
        document.dispatch(control.id, DomEvent::enter_key());
    }
}

/// Picks the option whose value or visible text equals `target`, falling back
/// to a case-insensitive match on the value. Returns false if none matches.
fn select_option<D: Document + ?Sized>(document: &mut D, control: &Control, target: &str) -> bool {
    let target_lower = target.to_lowercase();
    let option = control
        .options
        .iter()
        .find(|o| o.value == target || o.text == target)
        .or_else(|| {
            control
                .options
                .iter()
                .find(|o| o.value.to_lowercase() == target_lower)
        });

    let Some(option) = option else {
        return false;
    };
    document.set_value(control.id, &option.value);
    document.dispatch(control.id, DomEvent::Change);
    true
}

/// Attaches the resume to every file input whose `name` or `id` mentions
/// "resume" or "file". Returns the number of inputs touched.
pub fn attach_resume<D: Document + ?Sized>(document: &mut D, resume: &ResumeAttachment) -> usize {
    let targets: Vec<Control> = document
        .controls()
        .into_iter()
        .filter(|c| c.is_file_input())
        .filter(|c| RESUME_INPUT_MARKERS.iter().any(|m| c.name_or_id_contains(m)))
        .collect();

    for control in &targets {
        let file = AttachedFile {
            filename: resume.filename.clone(),
            content_type: RESUME_MIME.to_string(),
            size: resume.content.len(),
        };
        document.attach_files(control.id, vec![file]);
        document.dispatch(control.id, DomEvent::Change);
    }

    if !targets.is_empty() {
        debug!(
            "Attached resume '{}' to {} file input(s)",
            resume.filename,
            targets.len()
        );
    }
    targets.len()
}

/// Assigns skills positionally to inputs/textareas whose `name` contains
/// "skill". Surplus controls and surplus skills are both left alone.
pub fn fill_skills<D: Document + ?Sized>(
    document: &mut D,
    controls: &[Control],
    skills: &[String],
) -> usize {
    let skill_controls = controls.iter().filter(|c| {
        c.tag != ControlTag::Select
            && c.name
                .as_deref()
                .is_some_and(|n| n.contains(SKILL_INPUT_MARKER))
    });

    let mut filled = 0;
    for (control, skill) in skill_controls.zip(skills) {
        document.set_value(control.id, skill);
        document.dispatch(control.id, DomEvent::Input);
        filled += 1;
    }
    filled
}

/// True if any text-like control the plan maps a non-empty value to is empty.
pub fn needs_refill<D: Document + ?Sized>(document: &D, plan: &FillPlan) -> bool {
    let controls = document.controls();

    plan.instructions
        .iter()
        .filter(|i| !i.value.render().is_empty())
        .any(|instruction| {
            controls.iter().any(|c| {
                c.tag != ControlTag::Select
                    && c.is_text_like()
                    && instruction.candidates.iter().any(|cand| c.matches_name_or_id(cand))
                    && c.value.is_empty()
            })
        })
}
