/// Canonical form of a category or subcategory name.
///
/// Trims surrounding whitespace and title-cases every alphabetic run: the
/// first letter of a run goes upper-case, the rest lower-case. Digits and
/// punctuation break runs, so `"fechado - ganho"` becomes `"Fechado - Ganho"`.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;

    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                // Multi-char upper-case expansions ("ß" -> "SS") keep only the
                // leading char upper-case so the result stays a fixed point.
                let mut upper = ch.to_uppercase();
                if let Some(first) = upper.next() {
                    out.push(first);
                }
                for rest in upper {
                    out.extend(rest.to_lowercase());
                }
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  joão  "), "João");
        assert_eq!(normalize_name("JOÃO"), "João");
        assert_eq!(normalize_name("fechado - ganho"), "Fechado - Ganho");
        assert_eq!(normalize_name("voz sobre IP (VoIP)"), "Voz Sobre Ip (Voip)");
        assert_eq!(normalize_name("e-mail de confirmação"), "E-Mail De Confirmação");
        assert_eq!(normalize_name("ligar em 1 dia"), "Ligar Em 1 Dia");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_normalize_name_is_idempotent() {
        for sample in [
            "  joão  ",
            "São PAULO",
            "norte",
            "straße ßa",
            "o'neil",
            "1st place",
            "ÇAÇA  dupla",
            "",
        ] {
            let once = normalize_name(sample);
            assert_eq!(normalize_name(&once), once, "sample {:?}", sample);
        }
    }

    #[test]
    fn test_case_and_whitespace_variants_collide() {
        assert_eq!(normalize_name("joão "), normalize_name("João"));
        assert_eq!(normalize_name(" NORTE"), normalize_name("norte"));
    }
}
