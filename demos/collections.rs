//! Example demonstrating collections (vectors, maps, tables, etc.).

use std::collections::BTreeMap;

use indexmap::IndexMap;
use xmlize::{from_str, to_string, Table};

#[derive(Debug, Default, PartialEq)]
struct Task {
    title: String,
    completed: bool,
    priority: u8,
}

xmlize::object!(Task { title, completed, priority });

#[derive(Debug, Default, PartialEq)]
struct TodoList {
    name: String,
    tasks: Vec<Task>,
    owners: IndexMap<String, String>,
}

xmlize::object!(TodoList { name, tasks, owners });

#[derive(Debug, Default, PartialEq)]
struct Book {
    title: String,
    author: String,
    year: u32,
    genres: Vec<String>,
    ratings: [u8; 3],
}

xmlize::object!(Book { title, author, year, genres, ratings });

fn main() {
    // Example 1: list of objects plus a dictionary
    println!("=== Todo List Example ===");

    let mut owners = IndexMap::new();
    owners.insert("Buy groceries".to_string(), "Alice".to_string());
    owners.insert("Clean house".to_string(), "Bob".to_string());

    let todo_list = TodoList {
        name: "Weekend Tasks".to_string(),
        tasks: vec![
            Task {
                title: "Buy groceries".to_string(),
                completed: false,
                priority: 1,
            },
            Task {
                title: "Clean house".to_string(),
                completed: true,
                priority: 2,
            },
        ],
        owners,
    };

    let xml = to_string(&todo_list).expect("Failed to serialize");
    println!("Serialized TodoList:");
    println!("{}", xml);
    println!();

    let parsed: TodoList = from_str(&xml).expect("Failed to deserialize");
    println!("Parsed {} tasks:", parsed.tasks.len());
    for task in &parsed.tasks {
        let status = if task.completed { "✓" } else { "○" };
        let owner = parsed.owners.get(&task.title).map_or("nobody", String::as_str);
        println!("  {} [P{}] {} ({})", status, task.priority, task.title, owner);
    }
    println!();

    // Example 2: top-level list, fixed arrays and keyed dictionaries
    println!("=== Library Example ===");

    let books = vec![
        Book {
            title: "The Rust Programming Language".to_string(),
            author: "Steve Klabnik".to_string(),
            year: 2018,
            genres: vec!["Programming".to_string(), "Technology".to_string()],
            ratings: [5, 4, 5],
        },
        Book {
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            year: 1949,
            genres: vec!["Fiction".to_string(), "Dystopian".to_string()],
            ratings: [5, 5, 4],
        },
    ];

    let xml = to_string(&books).expect("Failed to serialize");
    println!("Serialized Books:");
    println!("{}", xml);
    println!();

    let by_year: BTreeMap<u32, String> = books.iter().map(|b| (b.year, b.title.clone())).collect();
    println!("Keyed by year:");
    println!("{}", to_string(&by_year).expect("Failed to serialize"));
    println!();

    // Example 3: a table with a null cell
    println!("=== Table Example ===");

    let mut table = Table::new(["Title", "Year", "Note"]);
    for book in &books {
        table.push_row([Some(book.title.clone()), Some(book.year.to_string()), None]);
    }
    let xml = to_string(&table).expect("Failed to serialize");
    println!("{}", xml);

    let parsed: Table = from_str(&xml).expect("Failed to deserialize");
    println!("Parsed {} rows, columns {:?}", parsed.len(), parsed.columns());
    println!();

    // Verify roundtrips
    assert_eq!(todo_list, from_str::<TodoList>(&to_string(&todo_list).unwrap()).unwrap());
    assert_eq!(books, from_str::<Vec<Book>>(&to_string(&books).unwrap()).unwrap());
    assert_eq!(by_year, from_str::<BTreeMap<u32, String>>(&to_string(&by_year).unwrap()).unwrap());
    println!("All roundtrip verifications passed!");
}
