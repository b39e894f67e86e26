use crate::foundation::core::Rgba8;

/// Parse a CSS-style color string into straight RGBA8.
///
/// Accepted forms:
/// - `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
/// - `rgb(r, g, b)` / `rgba(r, g, b, a)` with channels `0..=255` or `n%`; an integer alpha is
///   `0..=255`, a fractional alpha (`0.5`) is `0..=1`
/// - `hsl(h, s%, l%)` / `hsla(h, s%, l%, a)`
/// - named colors (`white`, `black`, `red`, `transparent`, ...)
pub fn parse_color(input: &str) -> Result<Rgba8, String> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Err("color must be non-empty".to_owned());
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = function_args(&s, "rgba").or_else(|| function_args(&s, "rgb")) {
        return parse_rgb_args(&args);
    }
    if let Some(args) = function_args(&s, "hsla").or_else(|| function_args(&s, "hsl")) {
        return parse_hsl_args(&args);
    }
    named_color(&s).ok_or_else(|| format!("unknown color \"{input}\""))
}

fn function_args(s: &str, name: &str) -> Option<Vec<String>> {
    let inner = s.strip_prefix(name)?.trim_start().strip_prefix('(')?;
    let inner = inner.strip_suffix(')')?;
    Some(inner.split(',').map(|p| p.trim().to_owned()).collect())
}

fn parse_hex(hex: &str) -> Result<Rgba8, String> {
    fn nibble(c: char) -> Result<u8, String> {
        c.to_digit(16)
            .map(|d| d as u8 * 17)
            .ok_or_else(|| format!("invalid hex digit '{c}'"))
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !hex.is_ascii() {
        return Err("hex color must be ascii".to_owned());
    }

    match hex.len() {
        3 | 4 => {
            let mut ch = hex.chars();
            let mut next = || ch.next().map(nibble).unwrap_or(Ok(255));
            let r = next()?;
            let g = next()?;
            let b = next()?;
            let a = next()?;
            Ok(Rgba8::new(r, g, b, a))
        }
        6 => Ok(Rgba8::new(
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
            255,
        )),
        8 => Ok(Rgba8::new(
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
            hex_byte(&hex[6..8])?,
        )),
        _ => Err("hex color must be #rgb, #rgba, #rrggbb or #rrggbbaa".to_owned()),
    }
}

fn parse_rgb_args(args: &[String]) -> Result<Rgba8, String> {
    if args.len() != 3 && args.len() != 4 {
        return Err("rgb()/rgba() takes 3 or 4 components".to_owned());
    }

    fn channel(v: &str) -> Result<u8, String> {
        if let Some(p) = v.strip_suffix('%') {
            let p: f64 = p.trim().parse().map_err(|_| format!("invalid percent \"{v}\""))?;
            return Ok((p.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8);
        }
        let n: i64 = v.parse().map_err(|_| format!("invalid channel \"{v}\""))?;
        u8::try_from(n).map_err(|_| format!("channel {n} must be between 0 and 255"))
    }

    let r = channel(&args[0])?;
    let g = channel(&args[1])?;
    let b = channel(&args[2])?;
    let a = match args.get(3) {
        Some(a) => alpha(a)?,
        None => 255,
    };
    Ok(Rgba8::new(r, g, b, a))
}

fn parse_hsl_args(args: &[String]) -> Result<Rgba8, String> {
    if args.len() != 3 && args.len() != 4 {
        return Err("hsl()/hsla() takes 3 or 4 components".to_owned());
    }

    fn percent(v: &str) -> Result<f64, String> {
        let p = v
            .strip_suffix('%')
            .ok_or_else(|| format!("\"{v}\" must be a percentage"))?;
        let p: f64 = p.trim().parse().map_err(|_| format!("invalid percent \"{v}\""))?;
        Ok(p / 100.0)
    }

    let h: f64 = args[0]
        .trim_end_matches("deg")
        .parse()
        .map_err(|_| format!("invalid hue \"{}\"", args[0]))?;
    let s = percent(&args[1])?;
    let l = percent(&args[2])?;
    let a = match args.get(3) {
        Some(a) => alpha(a)?,
        None => 255,
    };
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Ok(Rgba8::new(to_u8(r), to_u8(g), to_u8(b), a))
}

fn alpha(v: &str) -> Result<u8, String> {
    if v.contains('.') {
        let f: f64 = v.parse().map_err(|_| format!("invalid alpha \"{v}\""))?;
        if !(0.0..=1.0).contains(&f) {
            return Err(format!("fractional alpha {f} must be between 0 and 1"));
        }
        return Ok(to_u8(f));
    }
    let n: i64 = v.parse().map_err(|_| format!("invalid alpha \"{v}\""))?;
    u8::try_from(n).map_err(|_| format!("alpha {n} must be between 0 and 255"))
}

fn to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn named_color(name: &str) -> Option<Rgba8> {
    let (r, g, b, a) = match name {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "lime" => (0, 255, 0, 255),
        "green" => (0, 128, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "cyan" | "aqua" => (0, 255, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        "darkgray" | "darkgrey" => (169, 169, 169, 255),
        "lightgray" | "lightgrey" => (211, 211, 211, 255),
        "silver" => (192, 192, 192, 255),
        "maroon" => (128, 0, 0, 255),
        "olive" => (128, 128, 0, 255),
        "navy" => (0, 0, 128, 255),
        "purple" => (128, 0, 128, 255),
        "teal" => (0, 128, 128, 255),
        "orange" => (255, 165, 0, 255),
        "gold" => (255, 215, 0, 255),
        "pink" => (255, 192, 203, 255),
        "brown" => (165, 42, 42, 255),
        "crimson" => (220, 20, 60, 255),
        _ => return None,
    };
    Some(Rgba8::new(r, g, b, a))
}
