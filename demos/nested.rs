//! Example demonstrating nested objects, pretty printing and shared references.

use std::cell::OnceCell;
use std::rc::Rc;

use chrono::NaiveDate;
use xmlize::{from_str_with, to_string, to_string_with, Config};

#[derive(Debug, Default, PartialEq)]
struct Address {
    street: String,
    city: String,
    country: String,
}

xmlize::object!(Address { street, city, country });

#[derive(Debug, Default, PartialEq)]
struct ContactInfo {
    email: String,
    phone: Option<String>,
}

xmlize::object!(ContactInfo { email, phone });

#[derive(Debug, Default, PartialEq)]
struct Employee {
    id: u32,
    first_name: String,
    last_name: String,
    hired: Option<chrono::NaiveDateTime>,
    address: Address,
    contact: ContactInfo,
    manager: Option<Box<Employee>>,
}

xmlize::object!(Employee { id, first_name, last_name, hired, address, contact, manager });

#[derive(Default)]
struct Node {
    name: String,
    next: OnceCell<Rc<Node>>,
}

xmlize::object!(Node { name, next });

fn main() {
    let boss = Employee {
        id: 1,
        first_name: "Alice".to_string(),
        last_name: "Smith".to_string(),
        hired: NaiveDate::from_ymd_opt(2010, 3, 15).and_then(|d| d.and_hms_opt(9, 0, 0)),
        address: Address {
            street: "123 Innovation Way".to_string(),
            city: "San Francisco".to_string(),
            country: "USA".to_string(),
        },
        contact: ContactInfo {
            email: "alice@techcorp.com".to_string(),
            phone: Some("555-1234".to_string()),
        },
        manager: None,
    };

    let employee = Employee {
        id: 2,
        first_name: "Bob".to_string(),
        last_name: "Johnson".to_string(),
        hired: None,
        address: Address {
            street: "789 Oak Ave".to_string(),
            city: "Berkeley".to_string(),
            country: "USA".to_string(),
        },
        contact: ContactInfo {
            email: "bob@techcorp.com".to_string(),
            phone: None,
        },
        manager: Some(Box::new(boss)),
    };

    // Pretty printed with a declaration
    let config = Config::new().with_indent("  ").with_declaration();
    let xml = to_string_with(&employee, None, &config).expect("Failed to serialize");
    println!("Serialized XML:");
    println!("{}", xml);
    println!();

    let parsed: Employee = from_str_with(&xml, &config).expect("Failed to deserialize");
    println!(
        "{} {} reports to {}",
        parsed.first_name,
        parsed.last_name,
        parsed.manager.as_ref().map_or("nobody", |m| m.first_name.as_str())
    );
    assert_eq!(employee, parsed);
    println!("Roundtrip verification passed!");
    println!();

    // A reference cycle is reported instead of recursing forever
    let first = Rc::new(Node {
        name: "first".to_string(),
        next: OnceCell::new(),
    });
    let second = Rc::new(Node {
        name: "second".to_string(),
        next: OnceCell::from(first.clone()),
    });
    let _ = first.next.set(second);

    match to_string(&first) {
        Ok(xml) => println!("Unexpected output: {}", xml),
        Err(err) => println!("Cycle detected: {}", err),
    }
}
