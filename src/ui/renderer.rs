use savanna_core::view::FieldSnapshot;
use savanna_data::Species;

const EMPTY: char = '.';

/// Draws the snapshot as one line of symbols per grid row.
pub fn render_grid(snapshot: &FieldSnapshot) -> String {
    let mut cells = vec![EMPTY; snapshot.depth * snapshot.width];
    for (location, species) in &snapshot.occupants {
        if location.row < snapshot.depth && location.col < snapshot.width {
            cells[location.row * snapshot.width + location.col] = species.symbol();
        }
    }

    let mut out = String::with_capacity(snapshot.depth * (snapshot.width + 1));
    for row in cells.chunks(snapshot.width.max(1)) {
        out.extend(row.iter());
        out.push('\n');
    }
    out
}

/// `L Lion  H Hyena ...`
pub fn legend() -> String {
    Species::ALL
        .iter()
        .map(|s| format!("{} {}", s.symbol(), s.name()))
        .collect::<Vec<_>>()
        .join("  ")
}
