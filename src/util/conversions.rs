use crate::util::constants::*;
use crate::util::options::SizeUnit;
use crate::util::Address;

/* Alignment */

pub fn is_address_aligned(addr: Address) -> bool {
    addr.is_aligned_to(BYTES_IN_ADDRESS)
}

pub const fn raw_align_up(val: usize, align: usize) -> usize {
    // See https://github.com/rust-lang/rust/blob/e620d0f337d0643c757bab791fc7d88d63217704/src/libcore/alloc.rs#L192
    val.wrapping_add(align).wrapping_sub(1) & !align.wrapping_sub(1)
}

pub const fn raw_is_aligned(val: usize, align: usize) -> bool {
    val & align.wrapping_sub(1) == 0
}

/* Conversion */

/// `None` if the byte count does not fit in a word.
pub const fn words_to_bytes(words: usize) -> Option<usize> {
    words.checked_mul(BYTES_IN_WORD)
}

/// Format a byte figure in the given unit, e.g. `2048` in `K` is `"2K"`.
/// Figures that do not divide evenly keep one decimal place.
pub fn bytes_to_formatted_string(bytes: usize, unit: SizeUnit) -> String {
    let divisor = match unit {
        SizeUnit::B => return bytes.to_string(),
        SizeUnit::K => BYTES_IN_KBYTE,
        SizeUnit::M => BYTES_IN_MBYTE,
        SizeUnit::G => BYTES_IN_GBYTE,
    };
    if bytes % divisor == 0 {
        format!("{}{}", bytes / divisor, unit)
    } else {
        format!("{:.1}{}", bytes as f64 / divisor as f64, unit)
    }
}

/// Percentage of `part` in `whole`. An empty `whole` is reported as 0%.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
