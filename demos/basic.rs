// Example: minimal host driving attach, resize, scroll, and measurement.
use virtual_pool::{Virtualizer, VirtualizerOptions};

struct Row {
    text: String,
}

fn main() {
    let options = VirtualizerOptions::new(
        1_000_000,
        |count| {
            (0..count)
                .map(|_| Row {
                    text: String::new(),
                })
                .collect()
        },
        |row: &mut Row, index| row.text = format!("Item #{index}"),
    )
    .with_default_extent(24)
    .with_overrender(2)
    // Rows render slightly taller as their labels grow; the engine folds the
    // measurements back into its geometry.
    .with_measure_element(Some(|row: &Row, _| 24 + (row.text.len() % 8) as u32))
    .with_on_range_change(Some(|range| println!("range changed: {range:?}")))
    .with_on_scroll_correction(Some(|c| println!("scroll corrected: {c:?}")));

    let mut v = Virtualizer::new(options);
    v.set_connected(true);
    v.set_viewport_extent(600);

    println!("total_extent={}", v.total_extent());
    println!("pool_capacity={}", v.pool_capacity());

    v.set_scroll_offset(123_456);
    println!(
        "after scroll: offset={} range={:?}",
        v.scroll_offset(),
        v.visible_range()
    );
    if let Some(first) = v.first_visible_index() {
        let row = v.element_for_index(first).unwrap();
        println!("first rendered row: {:?}", row.text);
    }

    let offset = v.scroll_to_index(999_999);
    println!(
        "after scroll_to_index: offset={offset} range={:?}",
        v.visible_range()
    );
}
