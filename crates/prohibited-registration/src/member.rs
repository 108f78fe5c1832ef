//! Registration-attempt record and payload parsing.

use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blocked registration attempt, as published on the topic.
///
/// Every field is optional. Unknown fields are ignored and absent ones take
/// their default, so `{}` is a valid (if uninformative) record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    #[serde(alias = "Email")]
    pub email: Option<String>,
    #[serde(alias = "Username")]
    pub username: Option<String>,
    #[serde(alias = "UnformattedUsername")]
    pub unformatted_username: Option<String>,
    #[serde(alias = "LevelId")]
    pub level_id: i32,
    #[serde(alias = "FirstName")]
    pub first_name: Option<String>,
    #[serde(alias = "LastName")]
    pub last_name: Option<String>,
    #[serde(alias = "CompanyId")]
    pub company_id: i32,
    #[serde(alias = "CreateDate", with = "timestamp")]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(alias = "UpdateDate", with = "timestamp")]
    pub update_date: Option<DateTime<Utc>>,
    #[serde(alias = "Currency")]
    pub currency: Option<String>,
    #[serde(alias = "StatusType")]
    pub status_type: Option<String>,
    #[serde(alias = "UniqueId")]
    pub unique_id: Option<String>,
    #[serde(alias = "SecondaryUniqueId")]
    pub secondary_unique_id: Option<String>,
    #[serde(alias = "JurisdictionCode")]
    pub jurisdiction_code: Option<String>,
    #[serde(alias = "CountryCode")]
    pub country_code: Option<String>,
    #[serde(alias = "PromoCode")]
    pub promo_code: Option<String>,
    #[serde(alias = "AffCode")]
    pub aff_code: Option<String>,
    #[serde(alias = "Btag")]
    pub btag: Option<String>,
    #[serde(alias = "CSource")]
    pub c_source: Option<String>,
    #[serde(alias = "CMedium")]
    pub c_medium: Option<String>,
    #[serde(alias = "CName")]
    pub c_name: Option<String>,
    #[serde(alias = "RefURL", alias = "refURL")]
    pub ref_url: Option<String>,
    #[serde(alias = "Host")]
    pub host: Option<String>,
}

impl Member {
    /// Email for display; absent renders as empty.
    pub fn email_text(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    pub fn username_text(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    pub fn country_text(&self) -> &str {
        self.country_code.as_deref().unwrap_or_default()
    }
}

/// Decode a raw payload into a [`Member`].
///
/// Returns `Ok(None)` when the payload is the JSON literal `null`, which is
/// distinct from an empty object. Anything that is not a JSON object (or
/// `null`) is a [`ServiceError::MalformedPayload`].
pub fn parse_member(payload: &[u8]) -> Result<Option<Member>, ServiceError> {
    serde_json::from_slice::<Option<Member>>(payload)
        .map_err(|e| ServiceError::MalformedPayload(e.to_string()))
}

/// Timestamps arrive as RFC 3339, as an offset-less ISO-8601 date-time
/// (taken to be UTC, seconds optional), as a bare date (midnight UTC), or
/// with an offset but no seconds.
mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M%:z";
    const DATE_FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };

        parse(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp {:?}", raw)))
    }

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        if let Ok(dt) = DateTime::parse_from_str(raw, OFFSET_FORMAT) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_camel_case_payload() {
        let payload = br#"{"email":"a@x.com","username":"a1","countryCode":"KP","companyId":7}"#;
        let member = parse_member(payload).unwrap().unwrap();

        assert_eq!(member.email.as_deref(), Some("a@x.com"));
        assert_eq!(member.username.as_deref(), Some("a1"));
        assert_eq!(member.country_code.as_deref(), Some("KP"));
        assert_eq!(member.company_id, 7);
        assert!(member.first_name.is_none());
    }

    #[test]
    fn test_parse_pascal_case_payload() {
        let payload = br#"{"Email":"b@x.com","CountryCode":"IR","CompanyId":3,"RefURL":"https://r.example"}"#;
        let member = parse_member(payload).unwrap().unwrap();

        assert_eq!(member.email.as_deref(), Some("b@x.com"));
        assert_eq!(member.country_code.as_deref(), Some("IR"));
        assert_eq!(member.company_id, 3);
        assert_eq!(member.ref_url.as_deref(), Some("https://r.example"));
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let member = parse_member(b"{}").unwrap().unwrap();
        assert_eq!(member, Member::default());
        assert_eq!(member.company_id, 0);
        assert_eq!(member.email_text(), "");
    }

    #[test]
    fn test_null_payload_is_not_an_error() {
        assert_eq!(parse_member(b"null").unwrap(), None);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let member = parse_member(br#"{"email":"c@x.com","favouriteColour":"teal"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(member.email.as_deref(), Some("c@x.com"));
    }

    #[test]
    fn test_malformed_payloads() {
        let payloads: [&[u8]; 5] = [b"not json", b"", b"{\"email\":", b"42", b"[1,2]"];
        for payload in payloads {
            let result = parse_member(payload);
            assert!(
                matches!(result, Err(ServiceError::MalformedPayload(_))),
                "payload {:?} should be malformed",
                String::from_utf8_lossy(payload)
            );
        }
    }

    #[test]
    fn test_wrong_field_type_is_malformed() {
        let result = parse_member(br#"{"companyId":"seven"}"#);
        assert!(matches!(result, Err(ServiceError::MalformedPayload(_))));
    }

    #[test]
    fn test_timestamps_with_and_without_offset() {
        let member = parse_member(
            br#"{"createDate":"2024-03-01T12:30:00Z","updateDate":"2024-03-02T08:00:00.250"}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            member.create_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
        );
        let update = member.update_date.unwrap();
        assert_eq!(
            update.timestamp(),
            Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap().timestamp()
        );
        assert_eq!(update.timestamp_subsec_millis(), 250);
    }

    fn create_date(raw: &str) -> Option<DateTime<Utc>> {
        let payload = serde_json::json!({ "email": "a@x.com", "createDate": raw });
        parse_member(payload.to_string().as_bytes())
            .unwrap()
            .unwrap()
            .create_date
    }

    #[test]
    fn test_timestamp_date_only_is_midnight_utc() {
        assert_eq!(
            create_date("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_timestamp_minute_precision() {
        assert_eq!(
            create_date("2024-03-01T12:30"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_timestamp_offset_without_seconds() {
        assert_eq!(
            create_date("2024-03-01T12:30+01:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 11, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_timestamp_seven_digit_fraction() {
        let parsed = create_date("2024-03-01T12:30:00.1234567").unwrap();
        assert_eq!(
            parsed.timestamp(),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap().timestamp()
        );
        assert_eq!(parsed.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn test_unparseable_timestamp_is_malformed() {
        let result = parse_member(br#"{"createDate":"last tuesday"}"#);
        assert!(matches!(result, Err(ServiceError::MalformedPayload(_))));
    }

    #[test]
    fn test_reserialization_preserves_present_fields() {
        let original = serde_json::json!({
            "email": "d@x.com",
            "username": "d1",
            "unformattedUsername": "D1",
            "levelId": 2,
            "firstName": "Dee",
            "lastName": "Example",
            "companyId": 11,
            "createDate": "2024-01-05T10:00:00Z",
            "currency": "EUR",
            "statusType": "Blocked",
            "uniqueId": "u-1",
            "secondaryUniqueId": "u-2",
            "jurisdictionCode": "MT",
            "countryCode": "CU",
            "promoCode": "WELCOME",
            "affCode": "aff",
            "btag": "bt",
            "cSource": "google",
            "cMedium": "cpc",
            "cName": "spring",
            "refUrl": "https://ref.example",
            "host": "signup.example"
        });

        let member = parse_member(original.to_string().as_bytes()).unwrap().unwrap();
        let reserialized = serde_json::to_value(&member).unwrap();

        for (key, value) in original.as_object().unwrap() {
            assert_eq!(&reserialized[key], value, "field {} changed", key);
        }
        assert!(reserialized["updateDate"].is_null());
    }
}
