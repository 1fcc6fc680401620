use civic_collections::{Catalog, CatalogRecord, WeightedGraph};
use tracing_subscriber::EnvFilter;

/// Example program: file a morning's service requests, then plan crew dispatch.
///
/// Usage: RUST_LOG=debug cargo run --example dispatch
#[derive(Debug)]
struct ServiceRequest {
    reference: &'static str,
    filed: &'static str,
    department: &'static str,
    location: &'static str,
    severity: i64,
}

impl CatalogRecord for ServiceRequest {
    type Id = &'static str;
    type Date = &'static str;
    type Category = &'static str;

    fn id(&self) -> &Self::Id {
        &self.reference
    }

    fn date(&self) -> &Self::Date {
        &self.filed
    }

    fn category(&self) -> &Self::Category {
        &self.department
    }

    fn priority(&self) -> i64 {
        self.severity
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut requests = Catalog::new();
    requests.extend([
        ServiceRequest {
            reference: "SR-1001",
            filed: "2024-03-04",
            department: "roads",
            location: "A",
            severity: 3,
        },
        ServiceRequest {
            reference: "SR-1002",
            filed: "2024-03-01",
            department: "water",
            location: "D",
            severity: 1,
        },
        ServiceRequest {
            reference: "SR-1003",
            filed: "2024-03-02",
            department: "roads",
            location: "B",
            severity: 2,
        },
        ServiceRequest {
            reference: "SR-1004",
            filed: "2024-03-05",
            department: "parks",
            location: "C",
            severity: 5,
        },
    ]);

    // Re-filed by a second caller; rejected.
    let accepted = requests.insert(ServiceRequest {
        reference: "SR-1002",
        filed: "2024-03-06",
        department: "water",
        location: "D",
        severity: 1,
    });
    println!("Duplicate SR-1002 accepted: {}", accepted);

    println!("=== Requests by filing date ===");
    for request in requests.in_date_order().iter() {
        println!(
            "  {} {} [{}] at {}",
            request.filed, request.reference, request.department, request.location
        );
    }

    println!("\n=== Filed between 2024-03-02 and 2024-03-04 ===");
    for request in requests.between(&"2024-03-02", &"2024-03-04").iter() {
        println!("  {}", request.reference);
    }

    let mut roads = WeightedGraph::new();
    roads.add_edge("DEPOT", "A", 10);
    roads.add_edge("DEPOT", "B", 25);
    roads.add_edge("DEPOT", "C", 15);
    roads.add_edge("A", "B", 5);
    roads.add_edge("B", "D", 12);
    roads.add_edge("C", "D", 8);

    println!("\n=== Reachability from DEPOT ===");
    println!("  {:?}", roads.bfs(&"DEPOT").to_vec());

    println!("\n=== Minimal road network to maintain ===");
    let tree = roads.mst(&"DEPOT");
    for edge in tree.iter() {
        println!("  {} -> {} ({})", edge.from, edge.to, edge.weight);
    }
    println!("  total: {}", tree.iter().map(|e| e.weight).sum::<u32>());

    println!("\n=== Dispatch order ===");
    while let Some(request) = requests.pop_most_urgent() {
        println!("  severity {} {} at {}", request.severity, request.reference, request.location);
    }
}
