//! Export buttons appended to the dashboard filter section.
//!
//! Injection is idempotent: a filter section that already holds an export
//! group is left untouched. A page without a filter section is not an error.

use super::{EXPORT_SECTION_CLASS, FILTER_SECTION_SELECTOR};
use crate::shared::export::ExportFormat;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    Injected,
    AlreadyPresent,
    NoFilterSection,
}

struct ExportButton {
    format: ExportFormat,
    class: &'static str,
    icon: &'static str,
}

const EXPORT_BUTTONS: [ExportButton; 2] = [
    ExportButton {
        format: ExportFormat::Csv,
        class: "btn btn-outline-primary btn-sm me-2",
        icon: "fa-file-csv",
    },
    ExportButton {
        format: ExportFormat::Json,
        class: "btn btn-outline-secondary btn-sm",
        icon: "fa-file-code",
    },
];

/// DOM operations used to place the export group
pub trait ExportHost {
    type Section;

    fn filter_section(&self) -> Result<Option<Self::Section>, JsValue>;

    fn has_export_section(&self, section: &Self::Section) -> Result<bool, JsValue>;

    fn append_export_section(
        &self,
        section: &Self::Section,
        on_export: &Rc<dyn Fn(ExportFormat)>,
    ) -> Result<(), JsValue>;
}

/// Append "Export CSV" / "Export JSON" buttons to `.filter-section` of the page
pub fn inject_export_buttons<F>(on_export: F) -> Result<InjectOutcome, JsValue>
where
    F: Fn(ExportFormat) + 'static,
{
    inject_into(&PageHost::current(), Rc::new(on_export))
}

/// Check-before-insert: at most one export group per filter section
pub fn inject_into<H: ExportHost>(
    host: &H,
    on_export: Rc<dyn Fn(ExportFormat)>,
) -> Result<InjectOutcome, JsValue> {
    let Some(section) = host.filter_section()? else {
        return Ok(InjectOutcome::NoFilterSection);
    };
    if host.has_export_section(&section)? {
        return Ok(InjectOutcome::AlreadyPresent);
    }
    host.append_export_section(&section, &on_export)?;
    Ok(InjectOutcome::Injected)
}

/// The live page document
pub struct PageHost {
    document: Option<Document>,
}

impl PageHost {
    pub fn current() -> Self {
        Self {
            document: web_sys::window().and_then(|w| w.document()),
        }
    }
}

impl ExportHost for PageHost {
    type Section = Element;

    fn filter_section(&self) -> Result<Option<Element>, JsValue> {
        match &self.document {
            Some(document) => document.query_selector(FILTER_SECTION_SELECTOR),
            None => Ok(None),
        }
    }

    fn has_export_section(&self, section: &Element) -> Result<bool, JsValue> {
        Ok(section
            .query_selector(&format!(".{}", EXPORT_SECTION_CLASS))?
            .is_some())
    }

    fn append_export_section(
        &self,
        section: &Element,
        on_export: &Rc<dyn Fn(ExportFormat)>,
    ) -> Result<(), JsValue> {
        let Some(document) = &self.document else {
            return Ok(());
        };

        let export_section = document.create_element("div")?;
        export_section.set_class_name(&format!("{} mt-3", EXPORT_SECTION_CLASS));

        for button in &EXPORT_BUTTONS {
            let element = create_button(document, button, Rc::clone(on_export))?;
            export_section.append_child(&element)?;
        }

        section.append_child(&export_section)?;
        Ok(())
    }
}

fn create_button(
    document: &Document,
    button: &ExportButton,
    on_export: Rc<dyn Fn(ExportFormat)>,
) -> Result<Element, JsValue> {
    let element = document.create_element("button")?;
    element.set_attribute("type", "button")?;
    element.set_class_name(button.class);
    element.set_inner_html(&button_markup(button));

    let format = button.format;
    let handler = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_: web_sys::MouseEvent| {
        on_export(format);
    });
    element.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    // The button lives as long as the page
    handler.forget();

    Ok(element)
}

fn button_markup(button: &ExportButton) -> String {
    format!(
        r#"<i class="fas {} me-1"></i>Export {}"#,
        button.icon,
        button.format.label()
    )
}
