// Payment redirect: an auto-submitting POST form to the configured gateway.
// Credentials and amount are checked before any page is produced.
use crate::config::PaymentConfig;
use crate::model::PaymentError;
use crate::utils::escape_html;

/// Gateway amounts are fixed three-decimal strings; TND is subdivided into
/// millimes.
pub fn format_amount(amount: f64) -> String {
    format!("{:.3}", amount)
}

pub fn build_redirect_page(
    config: &PaymentConfig,
    amount: f64,
    order_id: &str,
    currency: &str,
) -> Result<String, PaymentError> {
    if config.user_name.trim().is_empty() || config.password.trim().is_empty() {
        return Err(PaymentError::MissingCredentials);
    }
    if !(amount > 0.0) {
        return Err(PaymentError::InvalidAmount(amount));
    }

    let fields: Vec<(&str, String)> = vec![
        ("userName", config.user_name.clone()),
        ("password", config.password.clone()),
        ("amount", format_amount(amount)),
        ("orderId", order_id.to_string()),
        ("currency", currency.to_string()),
    ];
    let inputs: String = fields
        .iter()
        .map(|(name, value)| {
            format!(
                "      <input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                name,
                escape_html(value)
            )
        })
        .collect();

    Ok(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"fr\">\n\
         <head><meta charset=\"utf-8\"><title>Paiement</title></head>\n\
         <body onload=\"document.getElementById('gateway').submit()\">\n\
         <p>Redirection vers la page de paiement sécurisée...</p>\n\
         <form id=\"gateway\" method=\"POST\" action=\"{}\">\n{}\
         <noscript><button type=\"submit\">Continuer vers le paiement</button></noscript>\n\
         </form>\n\
         </body>\n\
         </html>\n",
        escape_html(&config.gateway_url),
        inputs
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway_config() -> PaymentConfig {
        PaymentConfig {
            gateway_url: "https://pay.example/gateway".to_string(),
            user_name: "merchant".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn amount_always_carries_three_decimals() {
        assert_eq!(format_amount(495.0), "495.000");
        assert_eq!(format_amount(120.5), "120.500");
        assert_eq!(format_amount(10.1234), "10.123");
    }

    #[test]
    fn page_posts_every_gateway_field() {
        let page = build_redirect_page(&gateway_config(), 495.0, "TS-1-000001", "TND").unwrap();
        assert!(page.contains("action=\"https://pay.example/gateway\""));
        for name in ["userName", "password", "amount", "orderId", "currency"] {
            assert!(page.contains(&format!("name=\"{}\"", name)), "missing {}", name);
        }
        assert!(page.contains("value=\"495.000\""));
        assert!(page.contains("value=\"TS-1-000001\""));
        assert!(page.contains("value=\"TND\""));
        assert!(page.contains("method=\"POST\""));
    }

    #[test]
    fn missing_credentials_are_rejected_before_redirect() {
        let mut config = gateway_config();
        config.password = "  ".to_string();
        assert!(matches!(
            build_redirect_page(&config, 100.0, "TS-1", "TND"),
            Err(PaymentError::MissingCredentials)
        ));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let config = gateway_config();
        assert!(matches!(
            build_redirect_page(&config, 0.0, "TS-1", "TND"),
            Err(PaymentError::InvalidAmount(_))
        ));
        assert!(matches!(
            build_redirect_page(&config, -12.5, "TS-1", "TND"),
            Err(PaymentError::InvalidAmount(_))
        ));
        assert!(matches!(
            build_redirect_page(&config, f64::NAN, "TS-1", "TND"),
            Err(PaymentError::InvalidAmount(_))
        ));
    }

    #[test]
    fn values_are_attribute_escaped() {
        let mut config = gateway_config();
        config.user_name = "mer\"chant\"".to_string();
        let page = build_redirect_page(&config, 50.0, "TS-<1>", "TND").unwrap();
        assert!(page.contains("value=\"mer&quot;chant&quot;\""));
        assert!(page.contains("value=\"TS-&lt;1&gt;\""));
    }
}
