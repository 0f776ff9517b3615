use serde::{Deserialize, Serialize};

/// Listing category - closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Roupas,
    Eletronicos,
    Moveis,
    Eletrodomesticos,
    Brinquedos,
    Esportes,
    Veiculos,
    Outros,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Roupas,
        Category::Eletronicos,
        Category::Moveis,
        Category::Eletrodomesticos,
        Category::Brinquedos,
        Category::Esportes,
        Category::Veiculos,
        Category::Outros,
    ];

    /// Strict parse for request input - unknown categories are rejected
    /// at the validation boundary.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "roupas" => Some(Self::Roupas),
            "eletronicos" => Some(Self::Eletronicos),
            "moveis" => Some(Self::Moveis),
            "eletrodomesticos" => Some(Self::Eletrodomesticos),
            "brinquedos" => Some(Self::Brinquedos),
            "esportes" => Some(Self::Esportes),
            "veiculos" => Some(Self::Veiculos),
            "outros" => Some(Self::Outros),
            _ => None,
        }
    }

    /// Lenient parse for stored values - anything unrecognized reads as
    /// the catch-all category.
    pub fn parse_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Outros)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roupas => "roupas",
            Self::Eletronicos => "eletronicos",
            Self::Moveis => "moveis",
            Self::Eletrodomesticos => "eletrodomesticos",
            Self::Brinquedos => "brinquedos",
            Self::Esportes => "esportes",
            Self::Veiculos => "veiculos",
            Self::Outros => "outros",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_categories_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
    }

    #[test]
    fn unknown_category_is_rejected_strictly() {
        assert_eq!(Category::parse("imoveis"), None);
        assert_eq!(Category::parse_lossy("imoveis"), Category::Outros);
    }
}
