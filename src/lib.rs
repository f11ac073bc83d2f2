//! # xmlize
//!
//! Schema-less, bidirectional mapping between Rust values and XML.
//!
//! Types describe their own shape once, and that description drives both
//! directions: no schema files, no per-field attributes. Every value becomes
//! nested elements; attributes are never produced or consumed.
//!
//! ## Features
//!
//! - Objects, lists, fixed arrays, dictionaries, enums, timestamps and tables
//! - Tags inferred from type and field names (`birth_day` becomes `BirthDay`)
//! - Markup-bearing text wrapped in CDATA and recovered exactly
//! - Lossy by design: unknown elements are ignored, bad scalars default
//! - Cycle detection when serializing shared graphs
//! - Fast tokenization using SIMD-accelerated string searching
//!
//! ## Quick Start
//!
//! ```rust
//! use xmlize::{from_str, to_string};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! xmlize::object!(Person { name, age });
//!
//! let person = Person { name: "Alice".to_string(), age: 30 };
//! let xml = to_string(&person).unwrap();
//! assert_eq!(xml, "<Person><Name>Alice</Name><Age>30</Age></Person>");
//!
//! let back: Person = from_str(&xml).unwrap();
//! assert_eq!(back, person);
//! ```
//!
//! ## Collections and Dictionaries
//!
//! List items are tagged with their declared type. Dictionary keys become
//! element names, escaped when they are not valid names.
//!
//! ```rust
//! use indexmap::IndexMap;
//!
//! #[derive(Default)]
//! struct Profile {
//!     favorites: Vec<String>,
//!     scores: IndexMap<String, u32>,
//! }
//!
//! xmlize::object!(Profile { favorites, scores });
//!
//! let mut scores = IndexMap::new();
//! scores.insert("first try".to_string(), 7);
//! let profile = Profile { favorites: vec!["Math".to_string()], scores };
//!
//! assert_eq!(
//!     xmlize::to_string(&profile).unwrap(),
//!     "<Profile><Favorites><String>Math</String></Favorites>\
//!      <Scores><first_x0020_try>7</first_x0020_try></Scores></Profile>"
//! );
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use xmlize::{Config, EnumMode};
//!
//! #[derive(Default)]
//! enum Sex {
//!     #[default]
//!     Male,
//!     Female,
//! }
//!
//! xmlize::enumeration!(Sex { Male = 0, Female = 1 });
//!
//! let cfg = Config::new().with_enum_mode(EnumMode::Integer);
//! assert_eq!(xmlize::to_string_with(&Sex::Female, None, &cfg).unwrap(), "<Sex>1</Sex>");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod config;
pub mod de;
pub mod dom;
pub mod error;
pub mod escape;
mod impls;
pub mod naming;
pub mod reader;
pub mod registry;
pub mod ser;
pub mod shape;
pub mod table;
pub mod value;
pub mod writer;

// Re-export main types and functions
pub use config::{Config, EnumMode};
pub use de::{from_bytes, from_bytes_with, from_element, from_reader, from_str, from_str_with, Deserializer};
pub use dom::{Element, Node};
pub use error::{Error, ErrorKind, Position, Result};
pub use escape::unescape;
pub use naming::{decode_key, encode_key};
pub use reader::{XmlEvent, XmlReader};
pub use registry::{describe, Described};
pub use ser::{to_string, to_string_with, to_string_with_root, to_vec, to_vec_with, to_writer, Serializer};
pub use shape::{FieldInfo, Shape, TypeDescriptor, TypeInfo, TypeRef, Variant};
pub use table::Table;
pub use value::{MapKey, Scalar, View, Xmlize};
pub use writer::XmlWriter;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use indexmap::IndexMap;
    use proptest::prelude::*;

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    enum Sex {
        #[default]
        Male,
        Female,
    }
    crate::enumeration!(Sex { Male = 0, Female = 1 });

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Person {
        name: String,
        age: i32,
        sex: Sex,
        birth_day: Option<NaiveDateTime>,
        about: Option<String>,
        favorites: Vec<String>,
        nicknames: Option<Vec<String>>,
        friends: IndexMap<String, Person>,
        brother: Option<Box<Person>>,
        password: String,
    }
    crate::object!(Person {
        name,
        age,
        sex,
        birth_day,
        about,
        favorites,
        nicknames,
        friends,
        brother,
        #[skip] password,
    });

    #[derive(Debug, Default, PartialEq)]
    struct Card {
        name: String,
        age: i32,
    }
    crate::object!(Card { name, age });

    #[derive(Debug, Default, PartialEq)]
    struct Pal {
        name: String,
        friends: IndexMap<String, Pal>,
    }
    crate::object!(Pal { name, friends });

    #[derive(Debug, Default, PartialEq)]
    struct Note {
        title: String,
        body: Option<String>,
        sex: Sex,
        favorites: Vec<String>,
        created: NaiveDateTime,
    }
    crate::object!(Note { title, body, sex, favorites, created });

    fn pal(name: &str) -> Pal {
        Pal {
            name: name.to_string(),
            friends: IndexMap::new(),
        }
    }

    #[test]
    fn test_scenario_object() {
        let card = Card {
            name: "Kevin".to_string(),
            age: 21,
        };
        let xml = to_string_with_root(&card, "Person").unwrap();
        assert_eq!(xml, "<Person><Name>Kevin</Name><Age>21</Age></Person>");
        assert_eq!(from_str::<Card>(&xml).unwrap(), card);
    }

    #[test]
    fn test_scenario_list_field() {
        let note = Note {
            title: "t".to_string(),
            favorites: vec!["Math".to_string(), "Art".to_string()],
            ..Note::default()
        };
        let xml = to_string(&note).unwrap();
        assert!(xml.contains("<Favorites><String>Math</String><String>Art</String></Favorites>"));
        assert_eq!(from_str::<Note>(&xml).unwrap(), note);
    }

    #[test]
    fn test_scenario_dictionary_field() {
        let mut kevin = pal("Kevin");
        kevin.friends.insert("GirlFriend".to_string(), pal("Lucy"));
        kevin.friends.insert("BoyFriend".to_string(), pal("Tom"));

        let xml = to_string(&kevin).unwrap();
        assert_eq!(
            xml,
            "<Pal><Name>Kevin</Name><Friends>\
             <GirlFriend><Name>Lucy</Name><Friends></Friends></GirlFriend>\
             <BoyFriend><Name>Tom</Name><Friends></Friends></BoyFriend>\
             </Friends></Pal>"
        );

        let back: Pal = from_str(&xml).unwrap();
        assert_eq!(back.friends.keys().collect::<Vec<_>>(), ["GirlFriend", "BoyFriend"]);
        assert_eq!(back, kevin);
    }

    #[test]
    fn test_scenario_cdata() {
        let note = Note {
            title: "<b>&".to_string(),
            ..Note::default()
        };
        let xml = to_string(&note).unwrap();
        assert!(xml.starts_with("<Note><Title><![CDATA[<b>&]]></Title>"));
        assert_eq!(from_str::<Note>(&xml).unwrap().title, "<b>&");
    }

    #[test]
    fn test_scenario_skipped_null() {
        let note = Note {
            title: "t".to_string(),
            body: None,
            ..Note::default()
        };
        let xml = to_string(&note).unwrap();
        assert!(!xml.contains("Body"));

        let back: Note = from_str(&xml).unwrap();
        assert_eq!(back.body, None);
    }

    #[test]
    fn test_scenario_enum_modes() {
        let note = Note {
            sex: Sex::Female,
            ..Note::default()
        };
        let as_int = Config::new().with_enum_mode(EnumMode::Integer);
        let as_name = Config::new().with_enum_mode(EnumMode::Name);

        let int_xml = to_string_with(&note, None, &as_int).unwrap();
        let name_xml = to_string_with(&note, None, &as_name).unwrap();
        assert!(int_xml.contains("<Sex>1</Sex>"));
        assert!(name_xml.contains("<Sex>Female</Sex>"));

        for xml in [&int_xml, &name_xml] {
            for cfg in [&as_int, &as_name] {
                assert_eq!(from_str_with::<Note>(xml, cfg).unwrap().sex, Sex::Female);
            }
        }
    }

    #[test]
    fn test_unknown_children_are_ignored() {
        let card: Card =
            from_str("<Person><Nickname>K</Nickname><Name>Kevin</Name><Age><X/></Age></Person>").unwrap();
        assert_eq!(card.name, "Kevin");
        assert_eq!(card.age, 0);
    }

    #[test]
    fn test_mismatched_list_items_are_dropped() {
        let note: Note = from_str(
            "<Note><Favorites><String>Math</String><Subject>Art</Subject></Favorites></Note>",
        )
        .unwrap();
        assert_eq!(note.favorites, ["Math"]);
    }

    #[test]
    fn test_epoch_timestamp_is_suppressed() {
        let note = Note::default();
        let xml = to_string(&note).unwrap();
        assert!(!xml.contains("Created"));
        assert_eq!(from_str::<Note>(&xml).unwrap().created, NaiveDateTime::default());
    }

    #[test]
    fn test_skipped_field_round_trip() {
        let person = Person {
            name: "Kevin".to_string(),
            password: "hunter2".to_string(),
            ..Person::default()
        };
        let xml = to_string(&person).unwrap();
        assert!(!xml.contains("hunter2"));
        assert_eq!(from_str::<Person>(&xml).unwrap().password, "");
    }

    #[test]
    fn test_nested_object_round_trip() {
        let birth_day = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let person = Person {
            name: "Kevin".to_string(),
            age: 21,
            birth_day: Some(birth_day),
            brother: Some(Box::new(Person {
                name: "Sam".to_string(),
                ..Person::default()
            })),
            ..Person::default()
        };
        let xml = to_string(&person).unwrap();
        assert!(xml.contains("<BirthDay>2000-01-01 00:00:00</BirthDay>"));
        assert!(xml.contains("<Brother><Name>Sam</Name>"));
        assert_eq!(from_str::<Person>(&xml).unwrap(), person);
    }

    #[test]
    fn test_pretty_print_round_trip() {
        let mut kevin = pal("Kevin");
        kevin.friends.insert("Best".to_string(), pal(" Lucy "));
        let cfg = Config::new().with_indent("    ").with_declaration();

        let xml = to_string_with(&kevin, None, &cfg).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <Pal>\n    <Name>Kevin</Name>\n    <Friends>\n        <Best>\n            <Name> Lucy </Name>\n            <Friends></Friends>\n        </Best>\n    </Friends>\n</Pal>"
        );
        assert_eq!(from_str_with::<Pal>(&xml, &cfg).unwrap(), kevin);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        for bad in ["<Person><Name>Kevin</Person>", "<Person>", "", "Person", "<Person></Person><Extra/>"] {
            let err = from_str::<Card>(bad).unwrap_err();
            assert!(err.is_malformed(), "{bad:?} gave {err}");
        }
    }

    #[test]
    fn test_json_view_of_encoded_value() {
        let card = Card {
            name: "Kevin".to_string(),
            age: 21,
        };
        let root = dom::parse(&to_string(&card).unwrap()).unwrap();
        assert_eq!(
            serde_json::to_string(&root).unwrap(),
            r#"{"Card":{"Name":"Kevin","Age":"21"}}"#
        );
    }

    fn leaf_person() -> impl Strategy<Value = Person> {
        (
            any::<String>(),
            any::<i32>(),
            prop_oneof![Just(Sex::Male), Just(Sex::Female)],
            proptest::option::of(1i64..4_000_000_000),
            proptest::option::of(".*"),
            proptest::collection::vec(any::<String>(), 0..4),
            proptest::option::of(proptest::collection::vec(any::<String>(), 0..3)),
        )
            .prop_map(|(name, age, sex, secs, about, favorites, nicknames)| Person {
                name,
                age,
                sex,
                birth_day: secs.and_then(|s| DateTime::from_timestamp(s, 0)).map(|d| d.naive_utc()),
                about,
                favorites,
                nicknames,
                ..Person::default()
            })
    }

    fn person() -> impl Strategy<Value = Person> {
        (
            leaf_person(),
            proptest::collection::vec((any::<String>(), leaf_person()), 0..3),
            proptest::option::of(leaf_person()),
        )
            .prop_map(|(mut person, friends, brother)| {
                person.friends = friends.into_iter().collect();
                person.brother = brother.map(Box::new);
                person
            })
    }

    fn config() -> impl Strategy<Value = Config> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(camel, integer, pretty)| {
            let mut cfg = Config::new().with_lower_camel_tags(camel);
            if integer {
                cfg = cfg.with_enum_mode(EnumMode::Integer);
            }
            if pretty {
                cfg = cfg.with_indent("\t");
            }
            cfg
        })
    }

    proptest! {
        #[test]
        fn round_trip(person in person(), cfg in config()) {
            let xml = to_string_with(&person, None, &cfg).unwrap();
            let back: Person = from_str_with(&xml, &cfg).unwrap();
            prop_assert_eq!(back, person);
        }

        #[test]
        fn idempotent(person in person(), cfg in config()) {
            let xml = to_string_with(&person, None, &cfg).unwrap();
            let back: Person = from_str_with(&xml, &cfg).unwrap();
            prop_assert_eq!(to_string_with(&back, None, &cfg).unwrap(), xml);
        }

        #[test]
        fn dictionary_keys_round_trip(keys in proptest::collection::vec(any::<String>(), 0..6)) {
            let map: IndexMap<String, u8> = keys.into_iter().zip(0u8..).collect();
            let xml = to_string(&map).unwrap();
            prop_assert_eq!(from_str::<IndexMap<String, u8>>(&xml).unwrap(), map);
        }
    }
}
