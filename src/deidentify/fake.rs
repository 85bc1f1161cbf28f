//! Locale-appropriate fake replacement data
//!
//! Static tables of plausible surrogate values per language, keyed by a
//! coarse fake-data category. Model labels are mapped onto categories first;
//! a language missing a category falls back to the English table, and an
//! unknown category falls back to a mask placeholder.

use crate::domain::Language;
use rand::seq::SliceRandom;
use rand::rngs::StdRng;

/// Coarse categories the fake tables are organized by.
fn fake_key(entity_type: &str) -> String {
    let lowered = entity_type.to_ascii_lowercase();
    match lowered.as_str() {
        "first_name" | "firstname" => "FIRST_NAME",
        "last_name" | "lastname" => "LAST_NAME",
        "name" | "patient" | "doctor" | "person" => "NAME",
        "phone" | "phone_number" | "phonenumber" => "PHONE",
        "city" | "state" | "country" | "location" => "LOCATION",
        "street" | "street_address" | "streetaddress" | "address" => "STREET_ADDRESS",
        "date" | "date_of_birth" | "dateofbirth" | "dob" => "DATE",
        "id_num" | "ssn" | "national_id" | "mrn" | "medical_record_number" | "npi" => "ID_NUM",
        "email" => "EMAIL",
        "age" => "AGE",
        "username" => "USERNAME",
        "url" | "url_personal" => "URL_PERSONAL",
        "zip" | "zipcode" | "postcode" | "postal_code" => "ZIPCODE",
        _ => return entity_type.to_ascii_uppercase(),
    }
    .to_string()
}

fn table_for(language: Language, key: &str) -> Option<&'static [&'static str]> {
    let table = match language {
        Language::English => lookup_en(key),
        Language::French => lookup_fr(key),
        Language::German => lookup_de(key),
        Language::Italian => lookup_it(key),
        Language::Spanish => lookup_es(key),
    };
    table.or_else(|| lookup_en(key))
}

/// Pick a surrogate value for `entity_type` from the `language` tables.
///
/// Returns a mask-style placeholder when no table covers the type, so the
/// replace method degrades to mask rather than leaking the original.
pub fn fake_value(entity_type: &str, language: Language, rng: &mut StdRng) -> String {
    let key = fake_key(entity_type);
    match table_for(language, &key).and_then(|t| t.choose(rng)) {
        Some(value) => (*value).to_string(),
        None => format!("[{entity_type}]"),
    }
}

fn lookup_en(key: &str) -> Option<&'static [&'static str]> {
    Some(match key {
        "NAME" => &["Jane Smith", "John Doe", "Alex Johnson", "Sam Taylor"],
        "FIRST_NAME" => &["Jane", "John", "Alex", "Sam"],
        "LAST_NAME" => &["Smith", "Doe", "Johnson", "Taylor"],
        "EMAIL" => &["patient@example.com", "contact@example.org"],
        "PHONE" => &["555-0123", "555-0456", "555-0789"],
        "ID_NUM" => &["XXX-XX-1234", "MRN-987654"],
        "STREET_ADDRESS" => &["123 Main St", "456 Oak Ave"],
        "URL_PERSONAL" => &["https://example.com"],
        "USERNAME" => &["user123", "patient456"],
        "DATE" => &["01/01/2000", "12/31/1999"],
        "AGE" => &["45", "62", "38"],
        "LOCATION" => &["New York", "Los Angeles"],
        "ZIPCODE" => &["10001", "90210", "60601"],
        _ => return None,
    })
}

fn lookup_fr(key: &str) -> Option<&'static [&'static str]> {
    Some(match key {
        "NAME" => &["Marie Dupont", "Jean Martin", "Sophie Bernard", "Pierre Durand"],
        "FIRST_NAME" => &["Marie", "Jean", "Sophie", "Pierre"],
        "LAST_NAME" => &["Dupont", "Martin", "Bernard", "Durand"],
        "EMAIL" => &["patient@exemple.fr", "contact@exemple.org"],
        "PHONE" => &["+33 6 12 34 56 78", "+33 7 98 76 54 32", "01 23 45 67 89"],
        "ID_NUM" => &["1 85 05 78 006 084 36"],
        "STREET_ADDRESS" => &["12 rue de la Paix", "45 avenue Victor Hugo"],
        "URL_PERSONAL" => &["https://exemple.fr"],
        "USERNAME" => &["utilisateur123", "patient456"],
        "DATE" => &["01/01/2000", "31/12/1999"],
        "AGE" => &["45", "62", "38"],
        "LOCATION" => &["Paris", "Lyon", "Marseille"],
        "ZIPCODE" => &["75001", "69002", "13001"],
        _ => return None,
    })
}

fn lookup_de(key: &str) -> Option<&'static [&'static str]> {
    Some(match key {
        "NAME" => &["Anna Müller", "Hans Schmidt", "Petra Weber", "Klaus Fischer"],
        "FIRST_NAME" => &["Anna", "Hans", "Petra", "Klaus"],
        "LAST_NAME" => &["Müller", "Schmidt", "Weber", "Fischer"],
        "EMAIL" => &["patient@beispiel.de", "kontakt@beispiel.org"],
        "PHONE" => &["+49 30 1234567", "+49 89 9876543", "+49 170 1234567"],
        "ID_NUM" => &["12345678901"],
        "STREET_ADDRESS" => &["Hauptstraße 12", "Berliner Allee 45"],
        "URL_PERSONAL" => &["https://beispiel.de"],
        "USERNAME" => &["benutzer123", "patient456"],
        "DATE" => &["01.01.2000", "31.12.1999"],
        "AGE" => &["45", "62", "38"],
        "LOCATION" => &["Berlin", "München", "Hamburg"],
        "ZIPCODE" => &["10115", "80331", "20095"],
        _ => return None,
    })
}

fn lookup_it(key: &str) -> Option<&'static [&'static str]> {
    Some(match key {
        "NAME" => &["Maria Rossi", "Marco Bianchi", "Giulia Russo", "Luca Ferrari"],
        "FIRST_NAME" => &["Maria", "Marco", "Giulia", "Luca"],
        "LAST_NAME" => &["Rossi", "Bianchi", "Russo", "Ferrari"],
        "EMAIL" => &["paziente@esempio.it", "contatto@esempio.org"],
        "PHONE" => &["+39 333 1234567", "+39 06 12345678", "+39 348 9876543"],
        "ID_NUM" => &["RSSMRA85M01H501Z"],
        "STREET_ADDRESS" => &["Via Roma 12", "Piazza Garibaldi 3"],
        "URL_PERSONAL" => &["https://esempio.it"],
        "USERNAME" => &["utente123", "paziente456"],
        "DATE" => &["01/01/2000", "31/12/1999"],
        "AGE" => &["45", "62", "38"],
        "LOCATION" => &["Roma", "Milano", "Napoli"],
        "ZIPCODE" => &["00100", "20121", "80100"],
        _ => return None,
    })
}

fn lookup_es(key: &str) -> Option<&'static [&'static str]> {
    Some(match key {
        "NAME" => &["María López", "Carlos García", "Ana Martínez", "Pedro Sánchez"],
        "FIRST_NAME" => &["María", "Carlos", "Ana", "Pedro"],
        "LAST_NAME" => &["López", "García", "Martínez", "Sánchez"],
        "EMAIL" => &["paciente@ejemplo.es", "contacto@ejemplo.org"],
        "PHONE" => &["+34 612 345 678", "+34 934 567 890", "+34 711 234 567"],
        "ID_NUM" => &["12345678Z", "X1234567L"],
        "STREET_ADDRESS" => &["Calle Serrano 42", "Avenida de la Constitución 10"],
        "URL_PERSONAL" => &["https://ejemplo.es"],
        "USERNAME" => &["usuario123", "paciente456"],
        "DATE" => &["01/01/2000", "31/12/1999"],
        "AGE" => &["45", "62", "38"],
        "LOCATION" => &["Madrid", "Barcelona", "Sevilla"],
        "ZIPCODE" => &["28001", "08001", "41001"],
        _ => return None,
    })
}
