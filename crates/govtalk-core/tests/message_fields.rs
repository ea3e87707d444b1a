// crates/govtalk-core/tests/message_fields.rs
// ============================================================================
// Module: Message Field Tests
// Description: Constructor invariants for envelope header field types.
// ============================================================================
//! ## Overview
//! Exercises the exclusive message-class bounds, qualifier and method wire
//! forms, correlation-id and email patterns, and transaction id generation.

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

use govtalk_core::AuthenticationMethod;
use govtalk_core::CorrelationId;
use govtalk_core::FieldError;
use govtalk_core::MessageClass;
use govtalk_core::MessageQualifier;
use govtalk_core::SenderEmail;
use govtalk_core::TransactionId;
use govtalk_core::Transformation;
use govtalk_core::fresh_transaction_id;

#[test]
fn message_class_bounds_are_exclusive() {
    assert!(matches!(
        MessageClass::new("ABCD"),
        Err(FieldError::ClassLength { length: 4 })
    ));
    assert!(MessageClass::new("ABCDE").is_ok());
    assert!(MessageClass::new("A".repeat(31)).is_ok());
    assert!(matches!(
        MessageClass::new("A".repeat(32)),
        Err(FieldError::ClassLength { length: 32 })
    ));
}

#[test]
fn qualifier_parsing_is_case_insensitive_with_lowercase_wire_form() {
    assert_eq!(MessageQualifier::parse("request").expect("request"), MessageQualifier::Request);
    assert_eq!(
        MessageQualifier::parse("Acknowledgement").expect("acknowledgement"),
        MessageQualifier::Acknowledgement
    );
    assert_eq!(MessageQualifier::parse("POLL").expect("poll"), MessageQualifier::Poll);
    assert_eq!(MessageQualifier::Response.as_str(), "response");
    assert!(MessageQualifier::parse("ping").is_err());
}

#[test]
fn transformation_accepts_only_wire_spellings() {
    assert_eq!(Transformation::parse("XML").expect("xml"), Transformation::Xml);
    assert_eq!(Transformation::parse("HTML").expect("html"), Transformation::Html);
    assert_eq!(Transformation::parse("text").expect("text"), Transformation::Text);
    assert!(Transformation::parse("xml").is_err());
    assert_eq!(Transformation::default(), Transformation::Xml);
}

#[test]
fn authentication_method_accepts_only_wire_spellings() {
    assert_eq!(
        AuthenticationMethod::parse("clear").expect("clear"),
        AuthenticationMethod::Clear
    );
    assert_eq!(AuthenticationMethod::parse("MD5").expect("md5"), AuthenticationMethod::Md5);
    assert_eq!(
        AuthenticationMethod::parse("W3Csigned").expect("w3c"),
        AuthenticationMethod::W3cSigned
    );
    assert!(AuthenticationMethod::parse("md5").is_err());
    assert_eq!(AuthenticationMethod::Alternative.as_str(), "alternative");
}

#[test]
fn correlation_id_enforces_uppercase_hex_up_to_32() {
    assert!(CorrelationId::new("").is_ok());
    assert!(CorrelationId::new("0123456789ABCDEF").is_ok());
    assert!(CorrelationId::new("A".repeat(32)).is_ok());
    assert!(CorrelationId::new("A".repeat(33)).is_err());
    assert!(CorrelationId::new("abcdef").is_err());
    assert!(CorrelationId::new("G123").is_err());
}

#[test]
fn sender_email_follows_envelope_pattern() {
    assert!(SenderEmail::new("jane@doeofjohn.com").is_ok());
    assert!(SenderEmail::new("joe.bloggs_1@example-host.org").is_ok());
    assert!(SenderEmail::new("joebloggscom").is_err());
    assert!(SenderEmail::new("@example.com").is_err());
    assert!(SenderEmail::new("joe@").is_err());
    assert!(SenderEmail::new(format!("{}@example.com", "a".repeat(65))).is_err());
}

#[test]
fn transaction_ids_are_numeric_and_distinct() {
    let first = fresh_transaction_id();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = fresh_transaction_id();
    assert!(first.as_str().bytes().all(|byte| byte.is_ascii_digit()));
    assert!(second.as_str().bytes().all(|byte| byte.is_ascii_digit()));
    assert_ne!(first, second);
}

#[test]
fn transaction_id_constructor_rejects_non_digits() {
    assert!(TransactionId::new("123456").is_ok());
    assert!(TransactionId::new("").is_err());
    assert!(TransactionId::new("12A4").is_err());
}
