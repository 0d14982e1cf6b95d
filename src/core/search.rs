use crate::core::view::LicenseView;
use crate::domain::model::CompanyRecord;
use std::borrow::Cow;

/// A record that exposes a fixed list of free-text searchable fields.
pub trait Searchable {
    fn search_fields(&self) -> Vec<Cow<'_, str>>;
}

/// name, contact person, email
impl Searchable for CompanyRecord {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.contact_person.as_str()),
            Cow::Borrowed(self.email.as_str()),
        ]
    }
}

/// company name, license type code, status label
impl Searchable for LicenseView {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.license.company_name.as_str()),
            Cow::Borrowed(self.license.license_type.code()),
            Cow::Borrowed(self.status.label()),
        ]
    }
}

/// Case-insensitive substring match on any field. A blank query matches
/// everything; otherwise the query is matched as typed, spaces included.
pub fn matches<T: Searchable + ?Sized>(record: &T, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keeps matching records in their original order.
pub fn filter<'a, T: Searchable>(records: &'a [T], query: &str) -> Vec<&'a T> {
    records.iter().filter(|r| matches(*r, query)).collect()
}

/// Owned variant of [`filter`].
pub fn retain_matching<T: Searchable>(records: Vec<T>, query: &str) -> Vec<T> {
    records.into_iter().filter(|r| matches(r, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GpsCoordinates;

    fn company(name: &str, contact: &str, email: &str) -> CompanyRecord {
        CompanyRecord {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            email: email.to_string(),
            contact_person: contact.to_string(),
            address: "Harare, Zimbabwe".to_string(),
            gps_coordinates: GpsCoordinates {
                lat: -17.8252,
                lng: 31.0335,
            },
        }
    }

    fn companies() -> Vec<CompanyRecord> {
        vec![
            company("TeleCom Solutions Ltd", "Tendai Moyo", "info@telecom.co.zw"),
            company("Radio Wave Broadcasting", "Rudo Chikwanha", "ops@radiowave.co.zw"),
            company("Mobile Connect", "Farai Ncube", "hello@mobileconnect.co.zw"),
        ]
    }

    #[test]
    fn test_case_insensitive_name_match() {
        let records = companies();
        let hits = filter(&records, "radio");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Radio Wave Broadcasting");
    }

    #[test]
    fn test_matches_contact_and_email() {
        let records = companies();
        assert_eq!(filter(&records, "NCUBE")[0].name, "Mobile Connect");
        assert_eq!(filter(&records, "telecom.co")[0].name, "TeleCom Solutions Ltd");
        // address is not a searchable field
        assert!(filter(&records, "harare").is_empty());
    }

    #[test]
    fn test_surrounding_spaces_are_part_of_the_query() {
        let records = vec![company("TeleCom Solutions Ltd", "Tendai Moyo", "info@telecom.co.zw")];
        assert!(filter(&records, "Ltd ").is_empty());
        assert!(filter(&records, " Tendai").is_empty());
        assert_eq!(filter(&records, "Solutions Ltd").len(), 1);
        assert_eq!(filter(&records, "tendai moyo").len(), 1);
    }

    #[test]
    fn test_blank_query_keeps_order() {
        let records = companies();
        let names: Vec<&str> = filter(&records, "   ").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["TeleCom Solutions Ltd", "Radio Wave Broadcasting", "Mobile Connect"]
        );
        assert_eq!(retain_matching(records, "").len(), 3);
    }

    #[test]
    fn test_filter_is_stable() {
        let records = companies();
        let names: Vec<&str> = filter(&records, "co.zw").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["TeleCom Solutions Ltd", "Radio Wave Broadcasting", "Mobile Connect"]
        );
    }
}
