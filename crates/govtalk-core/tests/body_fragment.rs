// crates/govtalk-core/tests/body_fragment.rs
// ============================================================================
// Module: Body Fragment Tests
// Description: Structured body mapping and serialization semantics.
// ============================================================================
//! ## Overview
//! Verifies the generic structure-to-XML mapping: named entries nest, list
//! entries repeat the parent element name, and scalars become leaves.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use govtalk_core::FragmentNode;
use govtalk_core::MessageBody;
use govtalk_core::XmlFragment;

#[test]
fn named_entries_become_nested_elements() {
    let fragment = XmlFragment::from_structure(
        "Address",
        FragmentNode::Map(vec![
            ("PostCode".to_string(), FragmentNode::text("AA1 1AA")),
            ("Country".to_string(), FragmentNode::text("England")),
        ]),
    );
    let xml = fragment.serialize().expect("serialize");
    assert!(xml.contains("<Address>"));
    assert!(xml.contains("<PostCode>AA1 1AA</PostCode>"));
    assert!(xml.contains("<Country>England</Country>"));
}

#[test]
fn list_entries_repeat_the_parent_element_name() {
    let fragment = XmlFragment::from_structure(
        "Address",
        FragmentNode::Map(vec![(
            "Line".to_string(),
            FragmentNode::List(vec![
                FragmentNode::text("1 Test Street"),
                FragmentNode::text("Testtown"),
            ]),
        )]),
    );
    let xml = fragment.serialize().expect("serialize");
    // No wrapping element around the list: siblings inherit the entry name.
    assert!(xml.contains("<Line>1 Test Street</Line><Line>Testtown</Line>"));
    assert!(!xml.contains("<Line><Line>"));
}

#[test]
fn lists_of_mappings_wrap_each_entry_under_the_parent_name() {
    let fragment = XmlFragment::from_structure(
        "Keys",
        FragmentNode::Map(vec![(
            "Key".to_string(),
            FragmentNode::List(vec![
                FragmentNode::Map(vec![("Value".to_string(), FragmentNode::text("one"))]),
                FragmentNode::Map(vec![("Value".to_string(), FragmentNode::text("two"))]),
            ]),
        )]),
    );
    let xml = fragment.serialize().expect("serialize");
    assert_eq!(xml.matches("<Key>").count(), 2);
    assert!(xml.contains("<Value>one</Value>"));
    assert!(xml.contains("<Value>two</Value>"));
}

#[test]
fn raw_text_bodies_serialize_trimmed() {
    let body = MessageBody::RawText("\n  <Test>payload</Test>  \n".to_string());
    assert_eq!(body.serialize().expect("serialize"), "<Test>payload</Test>");
    assert!(!body.is_empty());
}

#[test]
fn empty_bodies_are_recognised() {
    assert!(MessageBody::empty().is_empty());
    assert!(MessageBody::RawText("   \n".to_string()).is_empty());
    assert_eq!(MessageBody::empty().serialize().expect("serialize"), "");
}
