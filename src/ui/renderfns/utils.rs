use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// "pikachu" -> "Pikachu"
pub fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// "mr-mime" -> "Mr Mime"
pub fn display_name(s: &str) -> String {
  s.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Pokedex number, zero-padded to three digits
pub fn format_id(id: u32) -> String {
  format!("#{:03}", id)
}

pub fn format_height(decimetres: u32) -> String {
  format!("{:.1} m", decimetres as f64 / 10.0)
}

pub fn format_weight(hectograms: u32) -> String {
  format!("{:.1} kg", hectograms as f64 / 10.0)
}

/// Roman numeral of the generation a national dex number belongs to
pub fn generation_from_id(id: u32) -> &'static str {
  match id {
    0..=151 => "I",
    152..=251 => "II",
    252..=386 => "III",
    387..=493 => "IV",
    494..=649 => "V",
    650..=721 => "VI",
    722..=809 => "VII",
    810..=905 => "VIII",
    _ => "IX",
  }
}

pub fn format_stat_name(stat: &str) -> String {
  match stat {
    "hp" => "HP".to_string(),
    "special-attack" => "Sp. Atk".to_string(),
    "special-defense" => "Sp. Def".to_string(),
    other => display_name(other),
  }
}

/// Color for a base stat value
pub fn stat_color(value: u32) -> Color {
  match value {
    100.. => Color::Green,
    80..=99 => Color::Yellow,
    60..=79 => Color::LightRed,
    _ => Color::DarkGray,
  }
}

/// Get the display color for a pokemon type
pub fn type_color(type_name: &str) -> Color {
  match type_name {
    "normal" => Color::Rgb(0xA8, 0xA8, 0x78),
    "fire" => Color::Rgb(0xF0, 0x80, 0x30),
    "water" => Color::Rgb(0x68, 0x90, 0xF0),
    "electric" => Color::Rgb(0xF8, 0xD0, 0x30),
    "grass" => Color::Rgb(0x78, 0xC8, 0x50),
    "ice" => Color::Rgb(0x98, 0xD8, 0xD8),
    "fighting" => Color::Rgb(0xC0, 0x30, 0x28),
    "poison" => Color::Rgb(0xA0, 0x40, 0xA0),
    "ground" => Color::Rgb(0xE0, 0xC0, 0x68),
    "flying" => Color::Rgb(0xA8, 0x90, 0xF0),
    "psychic" => Color::Rgb(0xF8, 0x58, 0x88),
    "bug" => Color::Rgb(0xA8, 0xB8, 0x20),
    "rock" => Color::Rgb(0xB8, 0xA0, 0x38),
    "ghost" => Color::Rgb(0x70, 0x58, 0x98),
    "dragon" => Color::Rgb(0x70, 0x38, 0xF8),
    "dark" => Color::Rgb(0x70, 0x58, 0x48),
    "steel" => Color::Rgb(0xB8, 0xB8, 0xD0),
    "fairy" => Color::Rgb(0xEE, 0x99, 0xAC),
    _ => Color::Rgb(0x68, 0xA0, 0x90),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Flabébé Pokémon", 8), "Flabé...");
  }

  #[test]
  fn test_display_name() {
    assert_eq!(display_name("pikachu"), "Pikachu");
    assert_eq!(display_name("mr-mime"), "Mr Mime");
    assert_eq!(display_name(""), "");
  }

  #[test]
  fn test_format_id() {
    assert_eq!(format_id(1), "#001");
    assert_eq!(format_id(25), "#025");
    assert_eq!(format_id(1010), "#1010");
  }

  #[test]
  fn test_format_measurements() {
    assert_eq!(format_height(7), "0.7 m");
    assert_eq!(format_weight(69), "6.9 kg");
    assert_eq!(format_weight(1000), "100.0 kg");
  }

  #[test]
  fn test_generation_boundaries() {
    assert_eq!(generation_from_id(151), "I");
    assert_eq!(generation_from_id(152), "II");
    assert_eq!(generation_from_id(905), "VIII");
    assert_eq!(generation_from_id(906), "IX");
  }

  #[test]
  fn test_stat_names() {
    assert_eq!(format_stat_name("hp"), "HP");
    assert_eq!(format_stat_name("special-attack"), "Sp. Atk");
    assert_eq!(format_stat_name("attack"), "Attack");
  }

  #[test]
  fn test_stat_color_thresholds() {
    assert_eq!(stat_color(120), Color::Green);
    assert_eq!(stat_color(80), Color::Yellow);
    assert_eq!(stat_color(60), Color::LightRed);
    assert_eq!(stat_color(59), Color::DarkGray);
  }

  #[test]
  fn test_type_color_fallback() {
    assert_eq!(type_color("fire"), Color::Rgb(0xF0, 0x80, 0x30));
    assert_eq!(type_color("stellar"), Color::Rgb(0x68, 0xA0, 0x90));
  }
}
