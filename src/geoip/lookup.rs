//! IP address parsing and MaxMind-backed lookups.

use std::net::IpAddr;

use maxminddb::{geoip2, Reader};

use super::database::GeoDatabase;
use super::types::{AsnRecord, CityRecord, CountryRecord, DatabaseKind, GeoIpMetadata};
use super::CITY_NAME_LOCALE;
use crate::error_handling::LookupError;

/// Parses a textual IPv4 or IPv6 address.
///
/// Returns `None` for anything that is not a bare address; surrounding
/// whitespace, ports and CIDR suffixes are rejected.
pub fn parse_address(value: &str) -> Option<IpAddr> {
    value.parse().ok()
}

/// An in-memory MaxMind database bound to the kind it was opened for.
pub struct MaxMindDatabase {
    reader: Reader<Vec<u8>>,
    kind: DatabaseKind,
    metadata: GeoIpMetadata,
}

impl MaxMindDatabase {
    pub(crate) fn new(reader: Reader<Vec<u8>>, kind: DatabaseKind, metadata: GeoIpMetadata) -> Self {
        Self {
            reader,
            kind,
            metadata,
        }
    }

    pub fn kind(&self) -> DatabaseKind {
        self.kind
    }
}

/// Fails unless a database opened for `bound` is asked for the same kind.
fn ensure_kind(bound: DatabaseKind, requested: DatabaseKind) -> Result<(), LookupError> {
    if bound == requested {
        Ok(())
    } else {
        Err(LookupError::UnsupportedKind(requested))
    }
}

impl From<geoip2::City<'_>> for CityRecord {
    fn from(city: geoip2::City<'_>) -> Self {
        let location = city.location.as_ref();
        CityRecord {
            country_iso_code: city
                .country
                .as_ref()
                .and_then(|c| c.iso_code)
                .unwrap_or_default()
                .to_string(),
            city_name: city
                .city
                .as_ref()
                .and_then(|c| c.names.as_ref())
                .and_then(|names| names.get(CITY_NAME_LOCALE).copied())
                .unwrap_or_default()
                .to_string(),
            latitude: location.and_then(|l| l.latitude).unwrap_or_default(),
            longitude: location.and_then(|l| l.longitude).unwrap_or_default(),
        }
    }
}

impl From<geoip2::Country<'_>> for CountryRecord {
    fn from(country: geoip2::Country<'_>) -> Self {
        CountryRecord {
            country_iso_code: country
                .country
                .and_then(|c| c.iso_code)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl From<geoip2::Asn<'_>> for AsnRecord {
    fn from(asn: geoip2::Asn<'_>) -> Self {
        AsnRecord {
            number: asn.autonomous_system_number.unwrap_or_default(),
            organization: asn
                .autonomous_system_organization
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl GeoDatabase for MaxMindDatabase {
    fn lookup_city(&self, ip: IpAddr) -> Result<CityRecord, LookupError> {
        ensure_kind(self.kind, DatabaseKind::City)?;
        let city: geoip2::City = self.reader.lookup(ip)?;
        Ok(city.into())
    }

    fn lookup_country(&self, ip: IpAddr) -> Result<CountryRecord, LookupError> {
        ensure_kind(self.kind, DatabaseKind::Country)?;
        let country: geoip2::Country = self.reader.lookup(ip)?;
        Ok(country.into())
    }

    fn lookup_asn(&self, ip: IpAddr) -> Result<AsnRecord, LookupError> {
        ensure_kind(self.kind, DatabaseKind::Asn)?;
        let asn: geoip2::Asn = self.reader.lookup(ip)?;
        Ok(asn.into())
    }

    fn metadata(&self) -> Option<&GeoIpMetadata> {
        Some(&self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_ipv4() {
        assert_eq!(
            parse_address("8.8.8.8"),
            Some(IpAddr::from([8, 8, 8, 8]))
        );
        assert!(parse_address("0.0.0.0").is_some());
    }

    #[test]
    fn test_parse_address_invalid_ip() {
        assert!(parse_address("not.an.ip.address").is_none());
    }

    #[test]
    fn test_parse_address_empty_string() {
        assert!(parse_address("").is_none());
    }

    #[test]
    fn test_parse_address_malformed_ipv4() {
        let malformed = vec!["256.1.1.1", "1.1.1", "1.1.1.1.1", "999.999.999.999"];
        for ip in malformed {
            assert!(
                parse_address(ip).is_none(),
                "Malformed IP {} should not parse",
                ip
            );
        }
    }

    #[test]
    fn test_parse_address_ipv6_formats() {
        let ipv6_formats = vec![
            "2001:0db8:85a3:0000:0000:8a2e:0370:7334", // Full
            "2001:db8:85a3::8a2e:370:7334",            // Compressed
            "::1",                                     // Loopback
            "fe80::1",                                 // Link-local
            "::ffff:192.168.1.1",                      // IPv4-mapped
        ];
        for ip in ipv6_formats {
            let parsed = parse_address(ip);
            assert!(
                matches!(parsed, Some(IpAddr::V6(_))),
                "IPv6 format {} should parse",
                ip
            );
        }
    }

    #[test]
    fn test_parse_address_whitespace() {
        let with_whitespace = vec![" 8.8.8.8 ", "8.8.8.8\n", "\t8.8.8.8"];
        for ip in with_whitespace {
            assert!(
                parse_address(ip).is_none(),
                "IP with whitespace {:?} should not parse",
                ip
            );
        }
    }

    #[test]
    fn test_parse_address_port_and_cidr() {
        assert!(parse_address("8.8.8.8:53").is_none());
        assert!(parse_address("10.0.0.0/8").is_none());
    }

    #[test]
    fn test_parse_address_null_bytes() {
        assert!(parse_address("8.8.8.8\0").is_none());
    }

    #[test]
    fn test_city_record_full() {
        let city: geoip2::City = serde_json::from_str(
            r#"{
                "city": {"geoname_id": 5375480, "names": {"de": "Mountain View", "en": "Mountain View"}},
                "country": {"iso_code": "US", "names": {"en": "United States"}},
                "location": {"latitude": 37.386, "longitude": -122.0838, "time_zone": "America/Los_Angeles"}
            }"#,
        )
        .expect("Failed to build city record");

        let record = CityRecord::from(city);
        assert_eq!(record.country_iso_code, "US");
        assert_eq!(record.city_name, "Mountain View");
        assert_eq!(record.latitude, 37.386);
        assert_eq!(record.longitude, -122.0838);
    }

    #[test]
    fn test_city_record_without_names() {
        let city: geoip2::City = serde_json::from_str(
            r#"{"city": {"geoname_id": 1}, "country": {"iso_code": "FR"}}"#,
        )
        .expect("Failed to build city record");
        let record = CityRecord::from(city);
        assert_eq!(record.city_name, "");
        assert_eq!(record.country_iso_code, "FR");
    }

    #[test]
    fn test_city_record_without_english_name() {
        let city: geoip2::City = serde_json::from_str(
            r#"{"city": {"names": {"de": "München", "fr": "Munich"}}, "country": {"iso_code": "DE"}}"#,
        )
        .expect("Failed to build city record");
        assert_eq!(CityRecord::from(city).city_name, "");
    }

    #[test]
    fn test_city_record_without_location_or_country() {
        let city: geoip2::City =
            serde_json::from_str(r#"{"city": {"names": {"en": "Paris"}}}"#)
                .expect("Failed to build city record");
        let record = CityRecord::from(city);
        assert_eq!(record.city_name, "Paris");
        assert_eq!(record.country_iso_code, "");
        assert_eq!(record.latitude, 0.0);
        assert_eq!(record.longitude, 0.0);
    }

    #[test]
    fn test_country_record() {
        let country: geoip2::Country =
            serde_json::from_str(r#"{"country": {"iso_code": "JP"}}"#)
                .expect("Failed to build country record");
        assert_eq!(CountryRecord::from(country).country_iso_code, "JP");

        let empty: geoip2::Country =
            serde_json::from_str("{}").expect("Failed to build country record");
        assert_eq!(CountryRecord::from(empty).country_iso_code, "");
    }

    #[test]
    fn test_asn_record() {
        let asn: geoip2::Asn = serde_json::from_str(
            r#"{"autonomous_system_number": 15169, "autonomous_system_organization": "Google LLC"}"#,
        )
        .expect("Failed to build ASN record");
        let record = AsnRecord::from(asn);
        assert_eq!(record.number, 15169);
        assert_eq!(record.organization, "Google LLC");
    }

    #[test]
    fn test_asn_record_without_organization() {
        let asn: geoip2::Asn = serde_json::from_str(r#"{"autonomous_system_number": 64512}"#)
            .expect("Failed to build ASN record");
        let record = AsnRecord::from(asn);
        assert_eq!(record.number, 64512);
        assert_eq!(record.organization, "");
    }

    #[test]
    fn test_ensure_kind() {
        assert!(ensure_kind(DatabaseKind::City, DatabaseKind::City).is_ok());
        assert_eq!(
            ensure_kind(DatabaseKind::City, DatabaseKind::Asn),
            Err(LookupError::UnsupportedKind(DatabaseKind::Asn))
        );
        assert_eq!(
            ensure_kind(DatabaseKind::Asn, DatabaseKind::Country),
            Err(LookupError::UnsupportedKind(DatabaseKind::Country))
        );
    }

    #[test]
    fn test_parse_address_very_long_string() {
        let long_string = "A".repeat(10000);
        assert!(parse_address(&long_string).is_none());
    }
}
