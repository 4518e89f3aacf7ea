use chrono_tz::Tz;

use crate::schedule::Slot;

/// Wall-clock rendering of a slot in the reference timezone (YYYY-MM-DD HH:MM)
pub fn format_local(slot: &Slot, tz: Tz) -> String {
    slot.instant().with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}

/// Prints a slot sequence, one line per slot: instant then local time
pub fn print_slots(slots: &[Slot], tz: Tz) {
    println!("{} slots ({})", slots.len(), tz.name());
    for (index, slot) in slots.iter().enumerate() {
        println!("  {:>3}  {}  {}", index + 1, slot, format_local(slot, tz));
    }
}
