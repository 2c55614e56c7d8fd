use listdom::{Element, ElementSurface, Fragment, LocatorKey, Surface};

fn item(id: &str) -> Fragment {
    Fragment::new(Element::li().id(id).text(format!("Item id: {id}")))
}

// ============================================================================
// Append / Clear
// ============================================================================

#[test]
fn test_append_preserves_order() {
    let surface = ElementSurface::list();
    for id in ["1", "2", "3"] {
        surface.append(&item(id));
    }
    assert_eq!(surface.child_ids(), vec!["1", "2", "3"]);
}

#[test]
fn test_clear_detaches_all_children() {
    let surface = ElementSurface::list();
    surface.append(&item("1"));
    surface.append(&item("2"));

    surface.clear();

    assert!(surface.is_empty());
    assert!(surface.find(&LocatorKey::id("1")).is_none());
}

#[test]
fn test_existing_children_are_kept() {
    let root = Element::ul().child(Element::li().id("static"));
    let surface = ElementSurface::new(root);
    surface.append(&item("1"));
    assert_eq!(surface.child_ids(), vec!["static", "1"]);
}

// ============================================================================
// Find
// ============================================================================

#[test]
fn test_find_by_id() {
    let surface = ElementSurface::list();
    let seven = item("7");
    surface.append(&item("6"));
    surface.append(&seven);

    let found = surface.find(&LocatorKey::parse("#7").unwrap()).unwrap();
    assert!(found.ptr_eq(&seven));
}

#[test]
fn test_find_by_data_attribute() {
    let surface = ElementSurface::list();
    let apple = Fragment::new(Element::li().data("name", "apple"));
    surface.append(&item("1"));
    surface.append(&apple);

    let found = surface.find(&LocatorKey::data("name", "apple")).unwrap();
    assert!(found.ptr_eq(&apple));
}

#[test]
fn test_find_searches_nested_elements() {
    let nested = Element::li()
        .id("outer")
        .child(Element::new("span").id("inner").text("deep"));
    let surface = ElementSurface::list();
    surface.append(&Fragment::new(nested));

    let inner = surface.find(&LocatorKey::id("inner")).unwrap();
    assert_eq!(inner.read(|el| el.text_content()), "deep");
}

#[test]
fn test_find_does_not_match_root() {
    let surface = ElementSurface::new(Element::ul().id("list"));
    assert!(surface.find(&LocatorKey::id("list")).is_none());
}

// ============================================================================
// Remove
// ============================================================================

#[test]
fn test_remove_detaches_only_target() {
    let surface = ElementSurface::list();
    let one = item("1");
    let two = item("2");
    surface.append(&one);
    surface.append(&two);

    assert!(surface.remove(&two));
    assert_eq!(surface.child_ids(), vec!["1"]);
}

#[test]
fn test_remove_unattached_fragment_is_noop() {
    let surface = ElementSurface::list();
    surface.append(&item("1"));

    assert!(!surface.remove(&item("1")));
    assert_eq!(surface.len(), 1);
}

#[test]
fn test_remove_nested_fragment() {
    let surface = ElementSurface::list();
    surface.append(&Fragment::new(
        Element::li().id("outer").child(Element::new("span").id("inner")),
    ));

    let inner = surface.find(&LocatorKey::id("inner")).unwrap();
    assert!(surface.remove(&inner));
    assert!(surface.find(&LocatorKey::id("inner")).is_none());
    assert_eq!(surface.child_ids(), vec!["outer"]);
}

// ============================================================================
// Shared handles
// ============================================================================

#[test]
fn test_mutation_through_handle_is_visible_in_tree() {
    let surface = ElementSurface::list();
    let one = item("1");
    surface.append(&one);

    one.set_opacity(0.0);

    let found = surface.find(&LocatorKey::id("1")).unwrap();
    assert_eq!(found.opacity(), 0.0);
}

#[test]
fn test_render_markup() {
    let surface = ElementSurface::new(Element::ul().id("list"));
    surface.append(&Fragment::new(Element::li().id("1").text("apple")));
    surface.append(&Fragment::new(Element::li().id("2").text("banana").opacity(0.5)));

    assert_eq!(
        surface.render(),
        "<ul id=\"list\"><li id=\"1\">apple</li>\
         <li id=\"2\" style=\"opacity: 0.50\">banana</li></ul>"
    );
}
