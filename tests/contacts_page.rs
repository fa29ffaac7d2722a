//! End-to-end flows over a rendered contacts page and the register page.

use std::time::Duration;

use contacts_ui::config::PageConfig;
use contacts_ui::dom::{Document, NodeId};
use contacts_ui::forms::field_error;
use contacts_ui::table::{self, SortDirection};
use contacts_ui::{AlwaysAccept, AlwaysDecline, Event, EventOutcome, PageBehaviors};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init();
}

// =============================================================
// Page builders
// =============================================================

struct ListPage {
    doc: Document,
    flash: NodeId,
    close: NodeId,
    search: NodeId,
    delete_icons: Vec<NodeId>,
    edit_links: Vec<NodeId>,
}

fn list_page(contacts: &[(&str, &str, &str)]) -> ListPage {
    let mut doc = Document::new();
    let root = doc.root();
    let body = doc.append_element(root, "body", &[]).unwrap();
    let main = doc.append_element(body, "main", &[("class", "container")]).unwrap();

    let flash = doc
        .append_element(main, "div", &[("class", "alert alert-success alert-dismissible fade show"), ("role", "alert")])
        .unwrap();
    doc.append_text(flash, "Contacto agregado exitosamente").unwrap();
    let close = doc
        .append_element(flash, "button", &[("type", "button"), ("class", "btn-close"), ("data-bs-dismiss", "alert")])
        .unwrap();

    let search = doc
        .append_element(main, "input", &[("id", "searchInput"), ("type", "text"), ("onkeyup", "searchContacts()")])
        .unwrap();

    let table = doc.append_element(main, "table", &[("class", "table")]).unwrap();
    let thead = doc.append_element(table, "thead", &[]).unwrap();
    let header = doc.append_element(thead, "tr", &[]).unwrap();
    for (i, title) in ["Nombre", "Correo", "Teléfono", "Acciones"].iter().enumerate() {
        let onclick = format!("sortTable({i})");
        let th = doc.append_element(header, "th", &[("onclick", onclick.as_str())]).unwrap();
        doc.append_text(th, title).unwrap();
    }

    let tbody = doc.append_element(table, "tbody", &[]).unwrap();
    let mut delete_icons = Vec::new();
    let mut edit_links = Vec::new();
    for (i, (name, email, phone)) in contacts.iter().enumerate() {
        let tr = doc.append_element(tbody, "tr", &[]).unwrap();
        for value in [name, email, phone] {
            let td = doc.append_element(tr, "td", &[]).unwrap();
            doc.append_text(td, value).unwrap();
        }
        let actions = doc.append_element(tr, "td", &[]).unwrap();
        let edit_href = format!("/contactos/editar/{i}");
        let edit = doc
            .append_element(
                actions,
                "a",
                &[("href", edit_href.as_str()), ("data-bs-toggle", "tooltip"), ("title", "Editar")],
            )
            .unwrap();
        doc.append_element(edit, "i", &[("class", "bi bi-pencil")]).unwrap();
        edit_links.push(edit);
        let delete_href = format!("/contactos/eliminar/{i}");
        let delete = doc.append_element(actions, "a", &[("href", delete_href.as_str())]).unwrap();
        delete_icons.push(doc.append_element(delete, "i", &[("class", "bi bi-trash")]).unwrap());
    }

    ListPage { doc, flash, close, search, delete_icons, edit_links }
}

fn visible_names(page: &PageBehaviors) -> Vec<String> {
    let doc = page.document();
    let table = table::find_table(doc).unwrap();
    table::rows(doc, table)
        .into_iter()
        .skip(1)
        .filter(|row| !table::is_hidden(doc, *row))
        .map(|row| doc.text_content(table::cells(doc, row)[0]))
        .collect()
}

const CONTACTS: &[(&str, &str, &str)] = &[
    ("Carla Gómez", "carla@example.com", "(555) 555-6666"),
    ("Ana Smith", "ana@example.com", "(555) 111-2222"),
    ("Bruno Díaz", "bruno@example.com", "(555) 333-4444"),
];

// =============================================================
// Contacts list
// =============================================================

#[test]
fn list_page_search_then_sort() {
    init_tracing();
    let ListPage { doc, search, .. } = list_page(CONTACTS);
    let mut page = PageBehaviors::init(doc, PageConfig::default(), AlwaysAccept);

    page.document_mut().set_value(search, "SMITH").unwrap();
    assert_eq!(page.search_contacts(), Some(1));
    assert_eq!(visible_names(&page), vec!["Ana Smith"]);

    page.document_mut().set_value(search, "").unwrap();
    assert_eq!(page.search_contacts(), Some(3));

    let first = page.sort_table(0).unwrap();
    assert_eq!(first.direction, SortDirection::Ascending);
    assert_eq!(visible_names(&page), vec!["Ana Smith", "Bruno Díaz", "Carla Gómez"]);

    let second = page.sort_table(0).unwrap();
    assert_eq!(second.direction, SortDirection::Descending);
    assert_eq!(visible_names(&page), vec!["Carla Gómez", "Bruno Díaz", "Ana Smith"]);
}

#[test]
fn hidden_rows_stay_hidden_through_sort() {
    init_tracing();
    let ListPage { doc, search, .. } = list_page(CONTACTS);
    let mut page = PageBehaviors::init(doc, PageConfig::default(), AlwaysAccept);
    page.document_mut().set_value(search, "bruno").unwrap();
    page.search_contacts();

    page.sort_table(1).unwrap();

    assert_eq!(visible_names(&page), vec!["Bruno Díaz"]);
}

#[test]
fn declining_delete_on_icon_cancels_navigation() {
    init_tracing();
    let ListPage { doc, delete_icons, .. } = list_page(CONTACTS);
    let mut page = PageBehaviors::init(doc, PageConfig::default(), AlwaysDecline);

    let outcome = page.dispatch(Event::Click(delete_icons[1]));

    assert!(outcome.default_prevented);
}

#[test]
fn edit_links_navigate_without_prompt() {
    init_tracing();
    let ListPage { doc, edit_links, .. } = list_page(CONTACTS);
    let mut page = PageBehaviors::init(doc, PageConfig::default(), AlwaysDecline);

    assert_eq!(page.dispatch(Event::Click(edit_links[0])), EventOutcome::default());
}

#[test]
fn flash_closed_by_hand_then_timer_fires_harmlessly() {
    init_tracing();
    let ListPage { doc, flash, close, .. } = list_page(CONTACTS);
    let mut page = PageBehaviors::init(doc, PageConfig::default(), AlwaysAccept);

    page.dispatch(Event::Click(close));
    assert!(!page.document().is_connected(flash));

    assert_eq!(page.advance(Duration::from_secs(5)), 1);
    assert!(!page.document().is_connected(flash));
}

#[test]
fn flash_auto_dismissed() {
    init_tracing();
    let ListPage { doc, flash, .. } = list_page(CONTACTS);
    let mut page = PageBehaviors::init(doc, PageConfig::default(), AlwaysAccept);

    page.advance(Duration::from_millis(2500));
    assert!(page.document().is_connected(flash));
    page.advance(Duration::from_millis(2500));
    assert!(!page.document().is_connected(flash));
}

#[test]
fn hovering_edit_link_shows_tooltip() {
    init_tracing();
    let ListPage { doc, edit_links, .. } = list_page(CONTACTS);
    let mut page = PageBehaviors::init(doc, PageConfig::default(), AlwaysAccept);
    let icon = page.document().children(edit_links[0])[0];

    page.dispatch(Event::PointerEnter(icon));
    let tips = page.document().find_all(page.document().root(), |el| el.attr("role") == Some("tooltip"));
    assert_eq!(tips.len(), 1);
    assert_eq!(page.document().text_content(tips[0]), "Editar");

    page.dispatch(Event::PointerLeave(icon));
    assert!(!page.document().is_connected(tips[0]));
}

// =============================================================
// Contact form
// =============================================================

#[test]
fn contact_form_flow() {
    init_tracing();
    let mut doc = Document::new();
    let root = doc.root();
    let form = doc.append_element(root, "form", &[("method", "post"), ("action", "/contactos/agregar"), ("novalidate", "")]).unwrap();
    let nombre = doc.append_element(form, "input", &[("name", "nombre"), ("required", "")]).unwrap();
    let correo = doc.append_element(form, "input", &[("name", "correo"), ("type", "email"), ("required", "")]).unwrap();
    let telefono = doc.append_element(form, "input", &[("name", "telefono")]).unwrap();
    let config = PageConfig::default();
    let mut page = PageBehaviors::init(doc, config.clone(), AlwaysAccept);

    let blocked = page.dispatch(Event::Submit(form));
    assert!(blocked.default_prevented && blocked.propagation_stopped);
    assert_eq!(field_error(page.document(), nombre, &config).as_deref(), Some("This field is required."));
    assert_eq!(field_error(page.document(), correo, &config).as_deref(), Some("This field is required."));

    page.document_mut().set_value(nombre, "Ana Smith").unwrap();
    page.document_mut().set_value(correo, "ana@example").unwrap();
    assert!(page.dispatch(Event::Submit(form)).default_prevented);
    assert_eq!(field_error(page.document(), nombre, &config), None);
    assert_eq!(field_error(page.document(), correo, &config).as_deref(), Some("Please enter a valid email."));

    page.document_mut().set_value(telefono, "555 123 45").unwrap();
    page.dispatch(Event::Input(telefono));
    assert_eq!(page.document().element(telefono).unwrap().value(), "(555) 123-45");

    page.document_mut().set_value(correo, "ana@example.com").unwrap();
    assert_eq!(page.dispatch(Event::Submit(form)), EventOutcome::default());
    assert_eq!(field_error(page.document(), correo, &config), None);
}

// =============================================================
// Register form
// =============================================================

#[test]
fn register_form_password_flow() {
    init_tracing();
    let mut doc = Document::new();
    let root = doc.root();
    let form = doc.append_element(root, "form", &[("method", "post"), ("action", "/auth/register"), ("novalidate", "")]).unwrap();
    let password = doc.append_element(form, "input", &[("id", "password"), ("type", "password"), ("required", "")]).unwrap();
    let confirm = doc
        .append_element(form, "input", &[("id", "confirm_password"), ("type", "password"), ("required", "")])
        .unwrap();
    let config = PageConfig::default();
    let mut page = PageBehaviors::init(doc, config.clone(), AlwaysAccept);

    page.document_mut().set_value(password, "secreto1").unwrap();
    for typed in ["s", "se", "secreto1"] {
        page.document_mut().set_value(confirm, typed).unwrap();
        page.dispatch(Event::Input(confirm));
    }
    assert_eq!(field_error(page.document(), confirm, &config), None);
    assert_eq!(page.check_passwords(), Some(true));

    page.document_mut().set_value(confirm, "secreto2").unwrap();
    page.dispatch(Event::Input(confirm));
    assert_eq!(field_error(page.document(), confirm, &config).as_deref(), Some("Passwords do not match"));
    assert_eq!(page.check_passwords(), Some(false));

    let feedback = page.document().find_all(form, |el| el.has_class("invalid-feedback"));
    assert_eq!(feedback.len(), 1);
}

#[test]
fn localized_config_drives_behaviors() {
    init_tracing();
    let config = PageConfig::from_json(
        r#"{
            "markers": { "phone_input_name": "phone", "delete_hrefs": ["/remove"] },
            "messages": { "required": "Este campo es obligatorio" }
        }"#,
    )
    .unwrap();
    let mut doc = Document::new();
    let root = doc.root();
    let form = doc.append_element(root, "form", &[("novalidate", "")]).unwrap();
    let name = doc.append_element(form, "input", &[("required", "")]).unwrap();
    let phone = doc.append_element(form, "input", &[("name", "phone")]).unwrap();
    let remove = doc.append_element(root, "a", &[("href", "/contacts/3/remove")]).unwrap();
    let mut page = PageBehaviors::init(doc, config.clone(), AlwaysDecline);

    page.dispatch(Event::Submit(form));
    assert_eq!(field_error(page.document(), name, &config).as_deref(), Some("Este campo es obligatorio"));

    page.document_mut().set_value(phone, "5551234567").unwrap();
    page.dispatch(Event::Input(phone));
    assert_eq!(page.document().element(phone).unwrap().value(), "(555) 123-4567");

    assert!(page.dispatch(Event::Click(remove)).default_prevented);
}
