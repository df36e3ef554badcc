const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// `0.931` renders as `93.1%`.
pub fn format_percent(probability: f32) -> String {
    format!("{:.1}%", (probability * 100.0).clamp(0.0, 100.0))
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        let suffix = if bytes == 1 { "" } else { "s" };
        format!("{bytes} byte{suffix}")
    }
}

pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    truncated.push('…');
    truncated
}

/// Turns region keys like `leftLung` or `cerebral cortex` into `Left Lung`
/// and `Cerebral Cortex`.
pub fn region_label(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in key.chars() {
        if ch == ' ' || ch == '_' || ch == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(ch);
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.93), "93.0%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(1.7), "100.0%");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(1), "1 byte");
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10.0 MB");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long file name.png", 6), "a very…");
    }

    #[test]
    fn test_region_label() {
        assert_eq!(region_label("leftLung"), "Left Lung");
        assert_eq!(region_label("cerebral cortex"), "Cerebral Cortex");
        assert_eq!(region_label("lungs"), "Lungs");
        assert_eq!(region_label(""), "");
    }
}
