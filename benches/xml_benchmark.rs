//! Benchmarks for xmlize performance.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use indexmap::IndexMap;
use xmlize::{from_str, to_string, Table};

// Simple struct for basic benchmarks
#[derive(Debug, Default, PartialEq, Clone)]
struct Simple {
    name: String,
    value: i64,
    active: bool,
}
xmlize::object!(Simple { name, value, active });

// Medium complexity struct
#[derive(Debug, Default, PartialEq, Clone)]
struct Medium {
    id: u64,
    title: String,
    description: String,
    count: i32,
    ratio: f64,
    enabled: bool,
    tags: Vec<String>,
}
xmlize::object!(Medium { id, title, description, count, ratio, enabled, tags });

#[derive(Debug, Default, PartialEq, Clone, Copy)]
enum Role {
    #[default]
    Engineer,
    Manager,
}
xmlize::enumeration!(Role { Engineer = 0, Manager = 1 });

// Complex nested struct
#[derive(Debug, Default, PartialEq, Clone)]
struct Address {
    street: String,
    city: String,
    state: String,
    zip: String,
    country: String,
}
xmlize::object!(Address { street, city, state, zip, country });

#[derive(Debug, Default, PartialEq, Clone)]
struct Employee {
    id: u64,
    first_name: String,
    last_name: String,
    email: String,
    age: u8,
    role: Role,
    hired: Option<chrono::NaiveDateTime>,
    address: Address,
    phone_numbers: Vec<String>,
}
xmlize::object!(Employee { id, first_name, last_name, email, age, role, hired, address, phone_numbers });

#[derive(Debug, Default, PartialEq, Clone)]
struct Company {
    name: String,
    founded: u32,
    employee_count: u32,
    headquarters: Address,
    employees: Vec<Employee>,
    offices: IndexMap<String, Address>,
}
xmlize::object!(Company { name, founded, employee_count, headquarters, employees, offices });

#[derive(Debug, Default, PartialEq)]
struct Batch {
    items: Vec<Simple>,
}
xmlize::object!(Batch { items });

fn address(street: String, city: &str) -> Address {
    Address {
        street,
        city: city.to_string(),
        state: "California".to_string(),
        zip: "94105".to_string(),
        country: "United States".to_string(),
    }
}

// Test data generators
fn simple_data() -> Simple {
    Simple {
        name: "Test Item".to_string(),
        value: 42,
        active: true,
    }
}

fn medium_data() -> Medium {
    Medium {
        id: 12345,
        title: "Sample Document".to_string(),
        description: "This is a sample document with <some> markup & text.".to_string(),
        count: 100,
        ratio: 1.23456,
        enabled: true,
        tags: vec![
            "tag1".to_string(),
            "tag2".to_string(),
            "tag3".to_string(),
            "important".to_string(),
        ],
    }
}

fn complex_data() -> Company {
    let hired = NaiveDate::from_ymd_opt(2015, 6, 1).and_then(|d| d.and_hms_opt(9, 0, 0));
    Company {
        name: "TechCorp International".to_string(),
        founded: 2010,
        employee_count: 5000,
        headquarters: address("123 Innovation Boulevard".to_string(), "San Francisco"),
        employees: (0..10)
            .map(|i| Employee {
                id: i as u64,
                first_name: format!("First{}", i),
                last_name: format!("Last{}", i),
                email: format!("person{}@techcorp.com", i),
                age: 25 + (i as u8 % 40),
                role: if i % 3 == 0 { Role::Manager } else { Role::Engineer },
                hired,
                address: address(format!("{} Oak Street", 100 + i), "Oakland"),
                phone_numbers: vec![format!("555-000{}", i), format!("555-100{}", i)],
            })
            .collect(),
        offices: (0..5)
            .map(|i| (format!("Office {}", i), address(format!("{} Main Street", i), "Austin")))
            .collect(),
    }
}

fn table_data(rows: usize) -> Table {
    let mut table = Table::new(["Id", "Name", "Score"]);
    for i in 0..rows {
        table.push_row([
            Some(i.to_string()),
            Some(format!("Row {}", i)),
            if i % 4 == 0 { None } else { Some((i * 7).to_string()) },
        ]);
    }
    table
}

fn simple_xml() -> &'static str {
    "<Simple><Name>Test Item</Name><Value>42</Value><Active>true</Active></Simple>"
}

fn medium_xml() -> String {
    to_string(&medium_data()).unwrap()
}

fn complex_xml() -> String {
    to_string(&complex_data()).unwrap()
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Serialization");

    let simple = simple_data();
    let medium = medium_data();
    let complex = complex_data();
    let table = table_data(100);

    group.bench_function("simple", |b| b.iter(|| to_string(black_box(&simple))));

    group.bench_function("medium", |b| b.iter(|| to_string(black_box(&medium))));

    group.bench_function("complex", |b| b.iter(|| to_string(black_box(&complex))));

    group.bench_function("table", |b| b.iter(|| to_string(black_box(&table))));

    group.finish();
}

fn bench_deserialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Deserialization");

    let simple_xml = simple_xml();
    let medium_xml = medium_xml();
    let complex_xml = complex_xml();
    let table_xml = to_string(&table_data(100)).unwrap();

    group.throughput(Throughput::Bytes(simple_xml.len() as u64));
    group.bench_function("simple", |b| b.iter(|| from_str::<Simple>(black_box(simple_xml))));

    group.throughput(Throughput::Bytes(medium_xml.len() as u64));
    group.bench_function("medium", |b| b.iter(|| from_str::<Medium>(black_box(&medium_xml))));

    group.throughput(Throughput::Bytes(complex_xml.len() as u64));
    group.bench_function("complex", |b| b.iter(|| from_str::<Company>(black_box(&complex_xml))));

    group.throughput(Throughput::Bytes(table_xml.len() as u64));
    group.bench_function("table", |b| b.iter(|| from_str::<Table>(black_box(&table_xml))));

    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("Roundtrip");

    let simple = simple_data();
    let medium = medium_data();
    let complex = complex_data();

    group.bench_function("simple", |b| {
        b.iter(|| {
            let xml = to_string(black_box(&simple)).unwrap();
            from_str::<Simple>(black_box(&xml)).unwrap()
        })
    });

    group.bench_function("medium", |b| {
        b.iter(|| {
            let xml = to_string(black_box(&medium)).unwrap();
            from_str::<Medium>(black_box(&xml)).unwrap()
        })
    });

    group.bench_function("complex", |b| {
        b.iter(|| {
            let xml = to_string(black_box(&complex)).unwrap();
            from_str::<Company>(black_box(&xml)).unwrap()
        })
    });

    group.finish();
}

fn bench_text(c: &mut Criterion) {
    use xmlize::escape;

    let mut group = c.benchmark_group("Text");

    let plain = "This is a simple string with no special characters at all.";
    let markup = "This string has <angle brackets> & ampersands.";
    let terminator = "<![CDATA[nested]]> ]]> ]]>";
    let entities = "Fish &amp; chips &lt;hot&gt; &#x263A;";

    group.bench_function("plain", |b| b.iter(|| escape::text(black_box(plain))));

    group.bench_function("markup", |b| b.iter(|| escape::text(black_box(markup))));

    group.bench_function("terminator", |b| b.iter(|| escape::text(black_box(terminator))));

    group.bench_function("unescape", |b| b.iter(|| escape::unescape(black_box(entities))));

    group.finish();
}

fn bench_xml_reader(c: &mut Criterion) {
    use xmlize::{XmlEvent, XmlReader};

    let mut group = c.benchmark_group("XmlReader");

    let xml = r#"<?xml version="1.0"?>
        <root>
            <child1>Text content</child1>
            <child2>
                <nested>Deep text</nested>
            </child2>
            <child3><![CDATA[<b>&]]></child3>
        </root>
    "#;

    group.throughput(Throughput::Bytes(xml.len() as u64));
    group.bench_function("parse_events", |b| {
        b.iter(|| {
            let mut reader = XmlReader::from_str(black_box(xml));
            let mut count = 0;
            loop {
                match reader.next_event() {
                    Ok(XmlEvent::Eof) => break,
                    Ok(_) => count += 1,
                    Err(_) => break,
                }
            }
            count
        })
    });

    group.bench_function("parse_dom", |b| b.iter(|| xmlize::dom::parse(black_box(xml))));

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scaling");

    for size in [1, 10, 100, 1000].iter() {
        let batch = Batch {
            items: (0..*size)
                .map(|i| Simple {
                    name: format!("Item {}", i),
                    value: i as i64,
                    active: i % 2 == 0,
                })
                .collect(),
        };
        let xml = to_string(&batch).unwrap();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("serialize", size), &batch, |b, data| {
            b.iter(|| to_string(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("deserialize", size), &xml, |b, xml| {
            b.iter(|| from_str::<Batch>(black_box(xml)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_serialization,
    bench_deserialization,
    bench_roundtrip,
    bench_text,
    bench_xml_reader,
    bench_scaling,
);

criterion_main!(benches);
