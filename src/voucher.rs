// Local export documents for a stored booking: printable voucher page and
// wallet pass. Generated on demand, nothing is sent anywhere.
use crate::model::BookingRecord;
use crate::payment::format_amount;
use crate::utils::escape_html;
use chrono::NaiveDate;
use serde_json::{Value, json};

fn display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn iso_date(date: Option<NaiveDate>) -> Value {
    match date {
        Some(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        None => Value::Null,
    }
}

/// Self-contained printable confirmation, presented at the hotel desk.
pub fn voucher_html(record: &BookingRecord, currency: &str) -> String {
    let rows = [
        ("Référence", record.reference.clone()),
        ("Hôtel", record.hotel_name.clone()),
        ("Ville", record.city.clone()),
        ("Client", record.guest_name.clone()),
        ("E-mail", record.guest_email.clone()),
        ("Arrivée", display_date(record.check_in)),
        ("Départ", display_date(record.check_out)),
        ("Nuits", record.nights.to_string()),
        ("Chambres", record.rooms_summary.clone()),
        (
            "Montant total",
            format!("{} {}", format_amount(record.total_amount), currency),
        ),
        ("Statut", record.status.clone()),
    ];
    let table: String = rows
        .iter()
        .map(|(label, value)| {
            format!(
                "      <tr><th>{}</th><td>{}</td></tr>\n",
                label,
                escape_html(value)
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"fr\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Bon de réservation {}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 2em; }}\n\
         table {{ border-collapse: collapse; }}\n\
         th, td {{ border: 1px solid #444; padding: 6px 12px; text-align: left; }}\n\
         </style>\n\
         </head>\n\
         <body onload=\"window.print()\">\n\
         <h1>Confirmation de réservation</h1>\n\
         <p>Merci de présenter ce bon à la réception de l'hôtel.</p>\n\
         <table>\n{}\
         </table>\n\
         </body>\n\
         </html>\n",
        escape_html(&record.reference),
        table
    )
}

/// Wallet-pass document for the same booking.
pub fn wallet_pass(record: &BookingRecord, currency: &str) -> Value {
    json!({
        "formatVersion": 1,
        "passType": "hotel-booking",
        "reference": record.reference,
        "hotelName": record.hotel_name,
        "city": record.city,
        "guestName": record.guest_name,
        "checkIn": iso_date(record.check_in),
        "checkOut": iso_date(record.check_out),
        "nights": record.nights,
        "rooms": record.rooms_summary,
        "totalAmount": format_amount(record.total_amount),
        "currency": currency,
        "status": record.status,
    })
}
