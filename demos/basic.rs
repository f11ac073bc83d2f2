//! Basic example demonstrating simple serialization and deserialization.

use xmlize::{from_str, to_string};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Sex {
    #[default]
    Male,
    Female,
}

xmlize::enumeration!(Sex { Male = 0, Female = 1 });

#[derive(Debug, Default, PartialEq)]
struct Person {
    name: String,
    age: u32,
    sex: Sex,
    email: Option<String>,
    password: String,
}

xmlize::object!(Person { name, age, sex, email, #[skip] password });

fn main() {
    // Create a person
    let person = Person {
        name: "Alice Smith".to_string(),
        age: 30,
        sex: Sex::Female,
        email: Some("alice@example.com".to_string()),
        password: "never written".to_string(),
    };

    // Serialize to XML
    let xml = to_string(&person).expect("Failed to serialize");
    println!("Serialized XML:");
    println!("{}", xml);
    println!();

    // Deserialize from XML; unknown elements are ignored
    let xml_input = r#"
        <Person>
            <Name>Bob Johnson</Name>
            <Age>25</Age>
            <Sex>0</Sex>
            <Nickname>Bobby</Nickname>
        </Person>
    "#;

    let parsed: Person = from_str(xml_input).expect("Failed to deserialize");
    println!("Deserialized person:");
    println!("  Name: {}", parsed.name);
    println!("  Age: {}", parsed.age);
    println!("  Sex: {:?}", parsed.sex);
    println!("  Email: {}", parsed.email.as_deref().unwrap_or("none"));
    println!();

    // Roundtrip
    let roundtrip_xml = to_string(&parsed).expect("Failed to serialize");
    let roundtrip: Person = from_str(&roundtrip_xml).expect("Failed to deserialize");
    assert_eq!(parsed, roundtrip);
    println!("Roundtrip successful!");
}
