use std::time::{SystemTime, UNIX_EPOCH};

const WEEKDAYS: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];
const MONTHS: [&str; 12] = [
  "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format a timestamp as an RFC 7231 IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
///
/// Times before the Unix epoch clamp to the epoch.
pub fn format_http_date(time: SystemTime) -> String {
  let secs = time
    .duration_since(UNIX_EPOCH)
    .map(|elapsed| elapsed.as_secs())
    .unwrap_or(0);
  let days = secs / 86_400;
  let seconds_of_day = secs % 86_400;
  let (year, month, day) = civil_from_days(days);

  format!(
    "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
    WEEKDAYS[(days % 7) as usize],
    day,
    MONTHS[(month - 1) as usize],
    year,
    seconds_of_day / 3_600,
    (seconds_of_day % 3_600) / 60,
    seconds_of_day % 60
  )
}

/// Gregorian date for a count of days since 1970-01-01.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
  let z = days + 719_468;
  let era = z / 146_097;
  let doe = z - era * 146_097;
  let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
  let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
  let mp = (5 * doy + 2) / 153;
  let day = doy - (153 * mp + 2) / 5 + 1;
  let month = if mp < 10 { mp + 3 } else { mp - 9 };
  let year = yoe + era * 400 + u64::from(month <= 2);
  (year, month, day)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
  }

  #[test]
  fn formats_the_rfc_example() {
    assert_eq!(format_http_date(at(784_111_777)), "Sun, 06 Nov 1994 08:49:37 GMT");
  }

  #[test]
  fn formats_epoch_and_leap_day() {
    assert_eq!(format_http_date(at(0)), "Thu, 01 Jan 1970 00:00:00 GMT");
    assert_eq!(format_http_date(at(951_782_400)), "Tue, 29 Feb 2000 00:00:00 GMT");
  }
}
