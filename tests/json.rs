// Test serialization using json
#![cfg(feature = "serde")]

use serde::{de::Deserialize, ser::Serialize};
use std::cmp::PartialEq;
use std::fmt::Debug;
use ui_text::fonts::{FamilyName, FontSelector};

fn test<X: Debug + PartialEq + Serialize + for<'a> Deserialize<'a>>(x: X, t: &str) {
    match serde_json::to_string(&x) {
        Ok(text) => assert_eq!(text, t),
        Err(err) => panic!("Ser of '{x:?}' failed: {err}"),
    }

    match serde_json::from_str::<X>(t) {
        Ok(v) => assert_eq!(v, x),
        Err(err) => panic!("Deser of '{t}' failed: {err}"),
    }
}

#[test]
fn family() {
    test(FamilyName::Named("abc".to_string()), "{\"Named\":\"abc\"}");
    test(FamilyName::Monospace, "\"Monospace\"");
}

#[test]
fn selector() {
    test(
        FontSelector::new(),
        "{\"families\":[],\"weight\":400,\"style\":\"Normal\"}",
    );

    let mut sel = FontSelector::new();
    sel.set_families([FamilyName::Named("abc".to_string()), FamilyName::SansSerif]);
    sel.set_bold(true);
    sel.set_italic(true);
    test(
        sel,
        "{\"families\":[{\"Named\":\"abc\"},\"SansSerif\"],\"weight\":700,\"style\":\"Italic\"}",
    );
}
