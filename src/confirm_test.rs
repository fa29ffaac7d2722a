use super::*;

fn contact_row() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    let cell = doc.append_element(root, "td", &[]).unwrap();
    let edit = doc.append_element(cell, "a", &[("href", "/contactos/editar/7")]).unwrap();
    let delete = doc.append_element(cell, "a", &[("href", "/contactos/eliminar/7"), ("class", "btn btn-danger")]).unwrap();
    let icon = doc.append_element(delete, "i", &[("class", "bi bi-trash")]).unwrap();
    (doc, edit, delete, icon)
}

#[test]
fn delete_href_markers_match_substrings() {
    let markers = vec!["delete".to_string(), "eliminar".to_string()];
    assert!(is_delete_href("/contactos/eliminar/3", &markers));
    assert!(is_delete_href("/contacts/3/delete", &markers));
    assert!(!is_delete_href("/contactos/editar/3", &markers));
}

#[test]
fn wire_finds_only_delete_links() {
    let (doc, _, delete, _) = contact_row();
    let confirmer = DeleteConfirmer::wire(&doc, &PageConfig::default());
    assert_eq!(confirmer.links(), &[delete]);
}

#[test]
fn decline_cancels_navigation() {
    let (doc, _, delete, _) = contact_row();
    let config = PageConfig::default();
    let confirmer = DeleteConfirmer::wire(&doc, &config);

    let decision = confirmer.on_click(&doc, delete, &config, &mut AlwaysDecline);

    assert_eq!(decision, Some(ClickDecision::Cancel));
}

#[test]
fn accept_lets_navigation_proceed() {
    let (doc, _, delete, _) = contact_row();
    let config = PageConfig::default();
    let confirmer = DeleteConfirmer::wire(&doc, &config);

    let decision = confirmer.on_click(&doc, delete, &config, &mut AlwaysAccept);

    assert_eq!(decision, Some(ClickDecision::Proceed));
}

#[test]
fn click_on_icon_inside_link_is_intercepted() {
    let (doc, _, _, icon) = contact_row();
    let config = PageConfig::default();
    let confirmer = DeleteConfirmer::wire(&doc, &config);

    assert_eq!(confirmer.on_click(&doc, icon, &config, &mut AlwaysDecline), Some(ClickDecision::Cancel));
}

#[test]
fn other_links_never_prompt() {
    let (doc, edit, _, _) = contact_row();
    let config = PageConfig::default();
    let confirmer = DeleteConfirmer::wire(&doc, &config);
    let mut asked = 0;
    let mut prompt = |_: &str| {
        asked += 1;
        false
    };

    assert_eq!(confirmer.on_click(&doc, edit, &config, &mut prompt), None);
    assert_eq!(asked, 0);
}

#[test]
fn prompt_shows_irreversible_warning() {
    let (doc, _, delete, _) = contact_row();
    let config = PageConfig::default();
    let confirmer = DeleteConfirmer::wire(&doc, &config);
    let mut seen = Vec::new();
    let mut prompt = |message: &str| {
        seen.push(message.to_string());
        true
    };

    confirmer.on_click(&doc, delete, &config, &mut prompt);

    assert_eq!(seen, vec![config.messages.delete_prompt.clone()]);
    assert!(seen[0].contains("cannot be undone"));
}
