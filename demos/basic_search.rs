//! Basic RP forest search
//!
//! The minimal example: build an index over three unit vectors, query it by
//! item and by vector.
//!
//! ```bash
//! RUST_LOG=spinney=debug cargo run --example basic_search
//! ```

use spinney::{RpForestIndex, TreeCount};
use tracing_subscriber::EnvFilter;

fn main() -> spinney::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Create an index for 3-dimensional vectors under the angular metric
    let mut index = RpForestIndex::from_metric_name(3, "angular")?;

    // 2. Add items
    index.add(0, vec![1.0, 0.0, 0.0])?;
    index.add(1, vec![0.0, 1.0, 0.0])?;
    index.add(2, vec![0.0, 0.0, 1.0])?;

    // 3. Build (-1 selects the tree count from the dimension)
    index.build(TreeCount::from_raw(-1)?)?;
    println!("Built {} trees over {} items", index.n_trees(), index.len());

    // 4. Search
    println!("Nearest neighbors to item 0:");
    for (id, distance) in index.search_by_item(0, 100)? {
        println!("  id={id}, distance={distance:.4}");
    }

    println!("Nearest neighbors to vector [1.0, 0.5, 0.5]:");
    for (id, distance) in index.search(&[1.0, 0.5, 0.5], 100)? {
        println!("  id={id}, distance={distance:.4}");
    }

    Ok(())
}
