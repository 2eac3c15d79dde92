//! Presentation mapping for raw wire values.
//!
//! Synchronisers keep server values raw (ISO dates, French status strings,
//! numeric amounts). Every rendering decision lives here instead, so no
//! interface layer re-interprets wire data ad hoc.

use crate::domain::ports::ApiError;

/// Interface locales the product renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayLocale {
    /// French, the production locale.
    #[default]
    FrFr,
    /// US English, used by the back-office.
    EnUs,
}

/// Visual weight attached to a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
    Neutral,
}

/// Map a wire status to its severity.
///
/// Statuses are opaque strings on the wire; unknown values render neutral
/// rather than failing.
#[must_use]
pub fn status_severity(statut: &str) -> Severity {
    match statut.trim().to_lowercase().as_str() {
        "payée" | "payee" | "payé" | "paye" | "validé" | "valide" | "terminée" | "terminee" => {
            Severity::Success
        }
        "en attente" | "en cours" => Severity::Warning,
        "rejetée" | "rejetee" | "rejeté" | "rejete" | "annulée" | "annulee" | "échoué"
        | "echoue" => Severity::Danger,
        _ => Severity::Neutral,
    }
}

/// Human label for a wire status: trimmed, first letter upper-cased.
#[must_use]
pub fn status_label(statut: &str) -> String {
    let trimmed = statut.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => {
            let mut label: String = first.to_uppercase().collect();
            label.push_str(chars.as_str());
            label
        }
        None => String::new(),
    }
}

/// Format a euro amount for the given locale.
///
/// French renders `"150,50 €"` with space-grouped thousands; US English
/// renders `"€150.50"` with comma-grouped thousands.
#[must_use]
pub fn format_eur(amount: f64, locale: DisplayLocale) -> String {
    let magnitude = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = magnitude
        .split_once('.')
        .unwrap_or((magnitude.as_str(), "00"));
    let sign = if amount.is_sign_negative() && magnitude != "0.00" {
        "-"
    } else {
        ""
    };
    match locale {
        DisplayLocale::FrFr => {
            format!("{sign}{},{frac_part} €", group_thousands(int_part, ' '))
        }
        DisplayLocale::EnUs => {
            format!("{sign}€{}.{frac_part}", group_thousands(int_part, ','))
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + 4);
    for (index, ch) in chars.iter().enumerate() {
        if index > 0 && (chars.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(*ch);
    }
    grouped
}

/// Render an ISO-8601 date or datetime as `dd/mm/yyyy`.
///
/// Returns `None` when the input does not parse; callers fall back to the
/// raw string.
#[must_use]
pub fn format_date_fr(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let date = chrono::DateTime::parse_from_rfc3339(trimmed)
        .map(|moment| moment.date_naive())
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
                .map(|moment| moment.date())
        })
        .or_else(|_| chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%d/%m/%Y").to_string())
}

/// How a failure should reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPresentation {
    /// Transient toast, used after a rolled-back mutation.
    Toast,
    /// Inline panel with a retry control, used for primary list loads.
    InlineRetry,
    /// No surface of its own; the session layer already reacts.
    Silent,
}

/// Default presentation for a failure.
///
/// Auth failures stay silent because the session layer clears the identity
/// and redirects on its own; surfacing them twice would double-notify.
#[must_use]
pub fn presentation_for(error: &ApiError) -> ErrorPresentation {
    match error {
        ApiError::Auth { .. } => ErrorPresentation::Silent,
        ApiError::Network { .. } | ApiError::Timeout { .. } | ApiError::Server { .. } => {
            ErrorPresentation::InlineRetry
        }
        ApiError::Forbidden { .. }
        | ApiError::Validation { .. }
        | ApiError::NotFound { .. }
        | ApiError::Rejected { .. }
        | ApiError::Decode { .. } => ErrorPresentation::Toast,
    }
}

/// Message shown to the user for a failure.
///
/// Server-authored messages pass through verbatim; transport-level failures
/// get fixed French copy.
#[must_use]
pub fn user_facing_message(error: &ApiError) -> String {
    if let Some(message) = error.server_message() {
        return message.to_owned();
    }
    match error {
        ApiError::Network { .. } => {
            "Connexion au serveur impossible. Vérifiez votre réseau.".to_owned()
        }
        ApiError::Timeout { .. } => {
            "Le serveur met trop de temps à répondre. Réessayez.".to_owned()
        }
        _ => "Une erreur est survenue côté serveur. Réessayez plus tard.".to_owned(),
    }
}
