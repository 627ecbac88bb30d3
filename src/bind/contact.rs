//! Contact page: form submit handling and transient feedback.

use super::BindContext;
use crate::dom::{self, Document, NodeId};
use crate::render::El;
use crate::site::Site;
use crate::Result;
use std::time::Duration;

pub const FORM: &str = "#contatoForm";
pub const FEEDBACK: &str = ".form-feedback";
pub const SUCCESS_MESSAGE: &str = "Mensagem enviada com sucesso!";

const CONTROLS: [&str; 3] = ["input", "textarea", "select"];

/// Register the contact form of the injected fragment as the submit target
pub async fn bind(ctx: &BindContext<'_>) -> Result<()> {
    match ctx.slot(FORM)? {
        Some(form) => {
            if ctx.with_state(|ui| ui.contact_form = Some(form)).is_some() {
                log::info!("Contact form ready");
            }
        }
        None => log::debug!("no {} in fragment", FORM),
    }
    Ok(())
}

fn is_control(doc: &Document, id: NodeId) -> bool {
    doc.tag(id).map(|t| CONTROLS.contains(&t)).unwrap_or(false)
}

fn input_type(doc: &Document, id: NodeId) -> String {
    doc.attr(id, "type").unwrap_or("text").to_ascii_lowercase()
}

fn options(doc: &Document, select: NodeId) -> Vec<NodeId> {
    doc.descendants(select)
        .into_iter()
        .filter(|&n| doc.tag(n) == Some("option"))
        .collect()
}

fn option_value(doc: &Document, option: NodeId) -> String {
    doc.attr(option, "value")
        .map(str::to_string)
        .unwrap_or_else(|| doc.text_content(option))
}

/// Current value of a form control; `None` for controls that do not submit
pub fn control_value(doc: &Document, id: NodeId) -> Option<String> {
    match doc.tag(id)? {
        "textarea" => Some(doc.text_content(id)),
        "select" => {
            let opts = options(doc, id);
            let chosen = opts
                .iter()
                .copied()
                .find(|&o| doc.attr(o, "selected").is_some())
                .or_else(|| opts.first().copied())?;
            Some(option_value(doc, chosen))
        }
        "input" => match input_type(doc, id).as_str() {
            "submit" | "button" | "reset" | "image" | "file" => None,
            "checkbox" | "radio" => doc
                .attr(id, "checked")
                .map(|_| doc.attr(id, "value").unwrap_or("on").to_string()),
            _ => Some(doc.attr(id, "value").unwrap_or_default().to_string()),
        },
        _ => None,
    }
}

/// Set the value of a form control as typing into it would
pub fn set_control_value(doc: &mut Document, id: NodeId, value: &str) {
    match doc.tag(id) {
        Some("textarea") => doc.set_text(id, value),
        Some("select") => {
            for option in options(doc, id) {
                if option_value(doc, option) == value {
                    doc.set_attr(option, "selected", "");
                } else {
                    doc.remove_attr(option, "selected");
                }
            }
        }
        Some("input") => match input_type(doc, id).as_str() {
            "checkbox" | "radio" => {
                if value.is_empty() {
                    doc.remove_attr(id, "checked");
                } else {
                    doc.set_attr(id, "checked", "");
                }
            }
            _ => doc.set_attr(id, "value", value),
        },
        _ => {}
    }
}

fn clear_control(doc: &mut Document, id: NodeId) {
    match doc.tag(id) {
        Some("textarea") => doc.set_text(id, ""),
        Some("select") => {
            for option in options(doc, id) {
                doc.remove_attr(option, "selected");
            }
        }
        Some("input") => match input_type(doc, id).as_str() {
            "submit" | "button" | "reset" | "image" | "hidden" => {}
            "checkbox" | "radio" => doc.remove_attr(id, "checked"),
            _ => doc.set_attr(id, "value", ""),
        },
        _ => {}
    }
}

/// Named values of the form's controls in document order. A repeated name
/// keeps its first position and takes the last value.
pub fn form_values(doc: &Document, form: NodeId) -> Vec<(String, String)> {
    let mut values: Vec<(String, String)> = Vec::new();
    for node in doc.descendants(form) {
        if !is_control(doc, node) || doc.attr(node, "disabled").is_some() {
            continue;
        }
        let Some(name) = doc.attr(node, "name").filter(|n| !n.is_empty()) else {
            continue;
        };
        if let Some(value) = control_value(doc, node) {
            match values.iter_mut().find(|(k, _)| k == name) {
                Some((_, existing)) => *existing = value,
                None => values.push((name.to_string(), value)),
            }
        }
    }
    values
}

fn show_feedback(doc: &mut Document, form: NodeId, message: &str) -> Option<NodeId> {
    let selector = dom::selector(FEEDBACK).ok()?;
    for existing in doc.select_in(form, &selector) {
        doc.detach(existing);
    }
    let feedback = El::new("div")
        .class("form-feedback form-feedback--success")
        .child(El::new("div").class("feedback-icon").text("✅"))
        .child(El::new("p").text(message));
    Some(doc.append_view(form, feedback.into()))
}

/// Handle a submit of the bound contact form.
///
/// The values are logged, a success notice replaces any earlier one and the
/// fields are emptied. Nothing is sent over the network. The notice is
/// removed after `feedback_ms` unless the page changed meanwhile.
pub fn handle_submit(site: &Site, form: NodeId) -> Vec<(String, String)> {
    let token = site.current_token();
    let (values, feedback) = {
        let mut doc = site.dom();
        let values = form_values(&doc, form);
        let feedback = show_feedback(&mut doc, form, SUCCESS_MESSAGE);
        let controls: Vec<NodeId> = doc
            .descendants(form)
            .into_iter()
            .filter(|&n| is_control(&doc, n))
            .collect();
        for control in controls {
            clear_control(&mut doc, control);
        }
        (values, feedback)
    };
    log::info!("Contact form submitted: {:?}", values);

    if let Some(feedback) = feedback {
        let weak = site.downgrade();
        let delay = Duration::from_millis(site.config().feedback_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(site) = Site::from_weak(&weak) else {
                return;
            };
            site.with_dom_if_current(token, |doc| {
                if doc.exists(feedback) && doc.is_attached(feedback) {
                    doc.detach(feedback);
                }
            });
        });
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM_HTML: &str = r#"<form id="contatoForm">
        <input name="nome" value="Ana">
        <input name="email" type="email" value="ana@example.com">
        <input name="news" type="checkbox" value="sim">
        <input name="termos" type="checkbox" checked>
        <select name="assunto"><option value="orcamento">Orçamento</option><option value="suporte" selected>Suporte</option></select>
        <textarea name="mensagem">Olá</textarea>
        <input type="text" value="sem nome">
        <button type="submit">Enviar</button>
    </form>"#;

    fn value<'a>(values: &'a [(String, String)], key: &str) -> Option<&'a str> {
        values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn form_doc() -> (Document, NodeId) {
        let doc = Document::parse(FORM_HTML);
        let form = doc.query(FORM).unwrap().unwrap();
        (doc, form)
    }

    #[test]
    fn collects_named_values() {
        let (doc, form) = form_doc();
        let values = form_values(&doc, form);
        let keys: Vec<&str> = values.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["nome", "email", "termos", "assunto", "mensagem"]);
        assert_eq!(value(&values, "nome"), Some("Ana"));
        assert_eq!(value(&values, "assunto"), Some("suporte"));
        assert_eq!(value(&values, "mensagem"), Some("Olá"));
        assert_eq!(value(&values, "termos"), Some("on"));
    }

    #[test]
    fn typing_updates_values() {
        let (mut doc, form) = form_doc();
        let nome = doc.query("input[name=\"nome\"]").unwrap().unwrap();
        let msg = doc.query("textarea").unwrap().unwrap();
        let select = doc.query("select").unwrap().unwrap();
        set_control_value(&mut doc, nome, "Bia");
        set_control_value(&mut doc, msg, "Oi");
        set_control_value(&mut doc, select, "orcamento");
        let values = form_values(&doc, form);
        assert_eq!(value(&values, "nome"), Some("Bia"));
        assert_eq!(value(&values, "mensagem"), Some("Oi"));
        assert_eq!(value(&values, "assunto"), Some("orcamento"));
    }

    #[test]
    fn feedback_replaces_previous() {
        let (mut doc, form) = form_doc();
        show_feedback(&mut doc, form, "um");
        show_feedback(&mut doc, form, "dois");
        let notices = doc.query_all(FEEDBACK).unwrap();
        assert_eq!(notices.len(), 1);
        assert!(doc.text_content(notices[0]).contains("dois"));
        assert!(doc.has_class(notices[0], "form-feedback--success"));
    }

    #[test]
    fn clearing_empties_fields() {
        let (mut doc, form) = form_doc();
        for node in doc.descendants(form) {
            if is_control(&doc, node) {
                clear_control(&mut doc, node);
            }
        }
        let values = form_values(&doc, form);
        assert_eq!(value(&values, "nome"), Some(""));
        assert_eq!(value(&values, "mensagem"), Some(""));
        assert_eq!(value(&values, "termos"), None);
        assert_eq!(value(&values, "assunto"), Some("orcamento"));
    }

    #[test]
    fn repeated_names_keep_first_position() {
        let doc = Document::parse(
            r#"<form id="contatoForm"><input name="b" value="1"><input name="a" value="x"><input name="b" value="2"></form>"#,
        );
        let form = doc.query(FORM).unwrap().unwrap();
        assert_eq!(
            form_values(&doc, form),
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "x".to_string())
            ]
        );
    }
}
