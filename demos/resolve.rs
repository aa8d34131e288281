//! Feed a handful of overlapping networks into the store and print how each
//! conflict was resolved.

use disjoint_cidr::{CidrStore, Entry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let networks = [
        ("123.123.123.0/24", "maybe my home network", [0, 0, 1]),
        ("123.123.122.0/23", "could be my home network", [0, 0, 2]),
        ("123.123.123.0/30", "it is my home network", [0, 0, 3]),
    ];

    let mut store = CidrStore::new();
    for (cidr, name, priority) in networks {
        let cidr: ipnet::IpNet = cidr.parse()?;
        let entry = Entry::new(cidr)
            .with_priority(priority)
            .with_attribute("name", name);
        // the report tells what the insertion conflicted with and how the
        // conflict was settled
        let report = store.insert(cidr, entry)?;
        println!("{report}");
    }

    // the resolved set is conflict free
    for snapshot in store.entries(false) {
        println!(
            "CIDR: {}, name: {}",
            snapshot.cidr(),
            snapshot.entry().attribute("name").unwrap_or("-"),
        );
    }

    if let Some(found) = store.lookup("123.123.123.16")? {
        println!(
            "found: CIDR: {}, name: {}",
            found.cidr(),
            found.entry().attribute("name").unwrap_or("-"),
        );
    }
    Ok(())
}
