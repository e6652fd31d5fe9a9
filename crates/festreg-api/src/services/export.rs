// CSV export of registrations

use anyhow::{anyhow, Result};

use festreg_core::Registration;

/// Fixed export column order; consumers key on these headers.
pub const EXPORT_HEADERS: [&str; 11] = [
    "Name",
    "Event",
    "Sub Fest",
    "Date",
    "Roll No",
    "Dept",
    "Year",
    "Mobile",
    "Email",
    "Team Members",
    "Sub Events",
];

/// Serialize registrations into CSV bytes. Rows come from the
/// denormalized snapshots taken at registration time, so no user lookups
/// happen here.
pub fn registrations_to_csv(registrations: &[Registration]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;

    for registration in registrations {
        let date = registration.registered_at.to_rfc3339();
        let year = registration.year.to_string();

        let team_members = registration
            .team_members
            .as_deref()
            .map(|members| {
                members
                    .iter()
                    .map(|member| format!("{} <{}>", member.full_name, member.email))
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .unwrap_or_default();

        let sub_events = registration
            .selected_sub_events
            .as_deref()
            .map(|selected| selected.join(", "))
            .unwrap_or_default();

        writer.write_record([
            registration.full_name.as_str(),
            registration.event_name.as_str(),
            registration.sub_fest.as_str(),
            date.as_str(),
            registration.roll_number.as_str(),
            registration.department.as_str(),
            year.as_str(),
            registration.mobile_number.as_str(),
            registration.student_email.as_str(),
            team_members.as_str(),
            sub_events.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush csv writer: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use festreg_core::TeamMember;
    use uuid::Uuid;

    fn registration() -> Registration {
        Registration {
            id: Uuid::now_v7(),
            event_id: "technology-anwesh-robo-race".to_string(),
            student_email: "asha@college.edu".to_string(),
            full_name: "Asha Verma".to_string(),
            roll_number: "CSE-21-042".to_string(),
            department: "CSE".to_string(),
            year: 2,
            mobile_number: "9876543210".to_string(),
            team_members: None,
            selected_sub_events: None,
            registered_at: Utc::now(),
            event_name: "Robo Race".to_string(),
            sub_fest: "TECHNOLOGY-ANWESH".to_string(),
        }
    }

    fn parse(bytes: Vec<u8>) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes.as_slice());
        reader
            .records()
            .map(|record| {
                record
                    .unwrap()
                    .iter()
                    .map(|field| field.to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_header_row_is_fixed() {
        let bytes = registrations_to_csv(&[]).unwrap();
        let rows = parse(bytes);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], EXPORT_HEADERS);
    }

    #[test]
    fn test_row_values_follow_column_order() {
        let bytes = registrations_to_csv(&[registration()]).unwrap();
        let rows = parse(bytes);
        assert_eq!(rows.len(), 2);
        let row = &rows[1];
        assert_eq!(row[0], "Asha Verma");
        assert_eq!(row[1], "Robo Race");
        assert_eq!(row[2], "TECHNOLOGY-ANWESH");
        assert_eq!(row[4], "CSE-21-042");
        assert_eq!(row[5], "CSE");
        assert_eq!(row[6], "2");
        assert_eq!(row[7], "9876543210");
        assert_eq!(row[8], "asha@college.edu");
        assert_eq!(row[9], "");
        assert_eq!(row[10], "");
    }

    #[test]
    fn test_team_members_joined_with_semicolons() {
        let mut reg = registration();
        reg.team_members = Some(vec![
            TeamMember {
                full_name: "Bela Rao".to_string(),
                email: "bela@college.edu".to_string(),
                roll_number: "CSE-21-043".to_string(),
                department: "CSE".to_string(),
                year: 2,
                mobile_number: "9876543211".to_string(),
            },
            TeamMember {
                full_name: "Chirag Sen".to_string(),
                email: "chirag@college.edu".to_string(),
                roll_number: "CSE-21-044".to_string(),
                department: "CSE".to_string(),
                year: 2,
                mobile_number: "9876543212".to_string(),
            },
        ]);
        reg.selected_sub_events = Some(vec!["line-follower".to_string(), "maze".to_string()]);

        let bytes = registrations_to_csv(&[reg]).unwrap();
        let rows = parse(bytes);
        assert_eq!(
            rows[1][9],
            "Bela Rao <bela@college.edu>; Chirag Sen <chirag@college.edu>"
        );
        assert_eq!(rows[1][10], "line-follower, maze");
    }
}
