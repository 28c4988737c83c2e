//! Message-template rendering for billing notifications.
//!
//! Templates carry four placeholder tokens: `{nome}`, `{valor}`,
//! `{vencimento}` and `{link}`. Every occurrence is substituted; unknown
//! tokens pass through untouched so template typos stay visible.

use chrono::NaiveDate;

use crate::money::format_brl;

#[derive(Debug, Clone)]
pub struct ChargeContext<'a> {
    pub customer_name: &'a str,
    pub amount_minor: i64,
    pub due_date: NaiveDate,
    pub payment_link: Option<&'a str>,
}

pub fn render(template: &str, context: &ChargeContext<'_>) -> String {
    template
        .replace("{nome}", context.customer_name)
        .replace("{valor}", &format_brl(context.amount_minor))
        .replace(
            "{vencimento}",
            &context.due_date.format("%d/%m/%Y").to_string(),
        )
        .replace("{link}", context.payment_link.unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ChargeContext<'static> {
        ChargeContext {
            customer_name: "Maria Souza",
            amount_minor: 10050,
            due_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
            payment_link: Some("https://pay.example.com/abc"),
        }
    }

    #[test]
    fn replaces_all_placeholders() {
        let rendered = render(
            "Olá {nome}, sua cobrança de {valor} vence em {vencimento}. Pague em {link}",
            &context(),
        );
        assert_eq!(
            rendered,
            "Olá Maria Souza, sua cobrança de R$ 100,50 vence em 15/09/2026. \
             Pague em https://pay.example.com/abc"
        );
    }

    #[test]
    fn replaces_repeated_placeholders() {
        let rendered = render("{nome} {nome}", &context());
        assert_eq!(rendered, "Maria Souza Maria Souza");
    }

    #[test]
    fn missing_link_renders_empty() {
        let mut ctx = context();
        ctx.payment_link = None;
        assert_eq!(render("Pague: {link}", &ctx), "Pague: ");
    }

    #[test]
    fn unknown_tokens_are_preserved() {
        assert_eq!(render("{desconto}", &context()), "{desconto}");
    }
}
