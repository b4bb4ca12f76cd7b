use std::collections::HashMap;

/// Region every unknown or absent code falls back to.
pub const DEFAULT_REGION: &str = "argentina";

pub struct Prompts;

impl Prompts {
    pub const ARGENTINA: &'static str = r###"Sos ChatEch, un asistente de IA especializado en e-commerce para Argentina. Ayudás a los clientes con sus compras online: seguimiento de pedidos, medios de pago (tarjetas en cuotas, Mercado Pago, transferencia), envíos dentro de Argentina y políticas de devolución. Respondés siempre en español rioplatense, con voseo, en un tono cercano y profesional. Si no sabés algo, lo decís directamente y sugerís contactar al vendedor."###;

    pub const MEXICO: &'static str = r###"Eres ChatEch, un asistente de IA especializado en e-commerce para México. Ayudas a los clientes con sus compras en línea: seguimiento de pedidos, medios de pago (tarjetas, meses sin intereses, OXXO Pay, transferencia SPEI), envíos dentro de la República y políticas de devolución. Respondes siempre en español de México, en un tono amable y profesional. Si no sabes algo, lo dices con claridad y sugieres contactar al vendedor."###;

    pub const USA: &'static str = r###"You are ChatEch, an AI assistant specialized in e-commerce for the United States. You help customers with their online purchases: order tracking, payment methods (credit cards, PayPal, financing), domestic shipping, sales tax questions, and return policies. You always answer in English, in a friendly and professional tone. If you do not know something, say so plainly and suggest contacting the seller."###;
}

/// Enumerated region-to-instruction mapping, built once at startup. Lookup is
/// total: unknown codes resolve to the default entry, never an error.
#[derive(Clone)]
pub struct PromptCatalog {
    entries: HashMap<&'static str, &'static str>,
}

impl PromptCatalog {
    pub fn new() -> Self {
        let entries = HashMap::from([
            ("argentina", Prompts::ARGENTINA),
            ("mexico", Prompts::MEXICO),
            ("usa", Prompts::USA),
        ]);

        Self { entries }
    }

    /// Returns the instruction for a region code, case-sensitive, falling
    /// back to the default entry.
    pub fn instruction_for(&self, region: &str) -> &'static str {
        self.entries
            .get(region)
            .copied()
            .unwrap_or(Prompts::ARGENTINA)
    }

    pub fn regions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_regions_return_their_exact_instruction() {
        let catalog = PromptCatalog::new();
        assert_eq!(catalog.instruction_for("argentina"), Prompts::ARGENTINA);
        assert_eq!(catalog.instruction_for("mexico"), Prompts::MEXICO);
        assert_eq!(catalog.instruction_for("usa"), Prompts::USA);
    }

    #[test]
    fn unknown_region_falls_back_to_default() {
        let catalog = PromptCatalog::new();
        assert_eq!(catalog.instruction_for("brasil"), Prompts::ARGENTINA);
        assert_eq!(catalog.instruction_for(""), Prompts::ARGENTINA);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let catalog = PromptCatalog::new();
        assert_eq!(catalog.instruction_for("Mexico"), Prompts::ARGENTINA);
        assert_eq!(catalog.instruction_for("USA"), Prompts::ARGENTINA);
    }

    #[test]
    fn default_region_is_in_the_catalog() {
        let catalog = PromptCatalog::new();
        assert!(catalog.regions().any(|r| r == DEFAULT_REGION));
        assert_eq!(
            catalog.instruction_for(DEFAULT_REGION),
            catalog.instruction_for("no-such-region")
        );
    }
}
