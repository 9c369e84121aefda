use std::thread;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::info;

use crate::domain::AppError;
use crate::record::Record;

/// The entity kinds the dashboard fetches. Each maps to one table page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Recruiters,
    Clients,
    Candidates,
    Performance,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Recruiters => "recruiters",
            EntityKind::Clients => "clients",
            EntityKind::Candidates => "candidates",
            EntityKind::Performance => "performance snapshots",
        }
    }
}

/// The data source seam. The dashboard always operates on the full
/// returned list client-side; no filtering or pagination is pushed down.
/// An implementation backed by a real API can be swapped in behind this
/// trait without touching the rest of the system.
pub trait DataProvider {
    fn fetch(&self, kind: EntityKind) -> Result<Vec<Record>, AppError>;
}

/// Average revenue per user: `round(total_revenue / total_users)`,
/// zero when there are no users.
pub fn arpu(total_revenue: f64, total_users: f64) -> i64 {
    if total_users > 0.0 {
        (total_revenue / total_users).round() as i64
    } else {
        0
    }
}

/// Stub provider returning hard-coded sample data after an artificial
/// delay, standing in for a real API.
pub struct SampleDataProvider {
    delay: Duration,
}

impl SampleDataProvider {
    pub fn new(delay: Duration) -> Self {
        SampleDataProvider { delay }
    }
}

impl DataProvider for SampleDataProvider {
    fn fetch(&self, kind: EntityKind) -> Result<Vec<Record>, AppError> {
        let start_time = Instant::now();
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let records = match kind {
            EntityKind::Recruiters => sample_recruiters(),
            EntityKind::Clients => sample_clients(),
            EntityKind::Candidates => sample_candidates(),
            EntityKind::Performance => sample_performance(),
        };
        info!(
            "Fetched {} {} in {}ms",
            records.len(),
            kind.label(),
            start_time.elapsed().as_millis()
        );
        Ok(records)
    }
}

/// Provider whose every fetch fails; used to exercise the
/// stale-but-available policy in tests.
#[cfg(test)]
pub struct FailingProvider;

#[cfg(test)]
impl DataProvider for FailingProvider {
    fn fetch(&self, kind: EntityKind) -> Result<Vec<Record>, AppError> {
        tracing::debug!("Simulated fetch failure for {}", kind.label());
        Err(AppError::IoError(std::io::Error::other(format!(
            "could not reach {} endpoint",
            kind.label()
        ))))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[rustfmt::skip]
fn recruiter(
    id: i64, name: &str, email: &str, phone: &str, department: &str, territory: &str,
    hired: i64, revenue: i64, join_date: NaiveDate, status: &str, trend: &str, location: &str,
) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("email", email)
        .with("phone", phone)
        .with("department", department)
        .with("territory", territory)
        .with("hired", hired)
        .with("revenue", revenue)
        .with("joinDate", join_date)
        .with("status", status)
        .with("trend", trend)
        .with("arpu", 50000)
        .with("location", location)
}

pub fn sample_recruiters() -> Vec<Record> {
    vec![
        recruiter(1, "Priya Sharma", "priya.sharma@company.com", "+91 98765 43210",
            "Technology", "Mumbai", 25, 1250000, date(2023, 1, 15), "active", "up",
            "Mumbai, Maharashtra"),
        recruiter(2, "Rahul Kumar", "rahul.kumar@company.com", "+91 98765 43211",
            "Finance", "Delhi", 18, 900000, date(2022, 11, 8), "active", "up",
            "New Delhi"),
        recruiter(3, "Anita Patel", "anita.patel@company.com", "+91 98765 43212",
            "Healthcare", "Ahmedabad", 22, 1100000, date(2023, 3, 22), "active", "up",
            "Ahmedabad, Gujarat"),
        recruiter(4, "Vikram Singh", "vikram.singh@company.com", "+91 98765 43213",
            "Manufacturing", "Pune", 15, 750000, date(2022, 8, 14), "active", "down",
            "Pune, Maharashtra"),
        recruiter(5, "Deepika Reddy", "deepika.reddy@company.com", "+91 98765 43214",
            "IT Services", "Hyderabad", 28, 1400000, date(2023, 2, 10), "active", "up",
            "Hyderabad, Telangana"),
        recruiter(6, "Arjun Nair", "arjun.nair@company.com", "+91 98765 43215",
            "Banking", "Kochi", 12, 600000, date(2022, 12, 5), "active", "up",
            "Kochi, Kerala"),
        recruiter(7, "Sneha Gupta", "sneha.gupta@company.com", "+91 98765 43216",
            "Consulting", "Gurgaon", 20, 1000000, date(2023, 4, 18), "active", "up",
            "Gurgaon, Haryana"),
        recruiter(8, "Karthik Krishnan", "karthik.krishnan@company.com", "+91 98765 43217",
            "Technology", "Bangalore", 30, 1500000, date(2022, 9, 30), "active", "up",
            "Bangalore, Karnataka"),
    ]
}

#[rustfmt::skip]
fn client(
    id: i64, name: &str, company: &str, email: &str, phone: &str, industry: &str,
    total_hired: i64, revenue: i64, avg_days_to_fill: i64, status: &str, location: &str,
    last_activity: NaiveDate,
) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("company", company)
        .with("email", email)
        .with("phone", phone)
        .with("industry", industry)
        .with("totalHired", total_hired)
        .with("revenue", revenue)
        .with("avgDaysToFill", avg_days_to_fill)
        .with("status", status)
        .with("location", location)
        .with("arpu", 50000)
        .with("lastActivity", last_activity)
}

pub fn sample_clients() -> Vec<Record> {
    vec![
        client(1, "Rajesh Mehta", "Tata Consultancy Services", "rajesh.mehta@tcs.com",
            "+91 98765 55101", "IT Services", 45, 2250000, 18, "active",
            "Mumbai, Maharashtra", date(2024, 1, 15)),
        client(2, "Sunita Agarwal", "HDFC Bank", "sunita.agarwal@hdfcbank.com",
            "+91 98765 55102", "Banking", 32, 1600000, 15, "active",
            "Mumbai, Maharashtra", date(2024, 1, 14)),
        client(3, "Amit Kumar", "Apollo Hospitals", "amit.kumar@apollohospitals.com",
            "+91 98765 55103", "Healthcare", 28, 1400000, 25, "pending",
            "Chennai, Tamil Nadu", date(2024, 1, 10)),
        client(4, "Pooja Sharma", "Reliance Industries", "pooja.sharma@ril.com",
            "+91 98765 55104", "Oil & Gas", 22, 1100000, 20, "active",
            "Mumbai, Maharashtra", date(2024, 1, 13)),
        client(5, "Manish Gupta", "Flipkart", "manish.gupta@flipkart.com",
            "+91 98765 55105", "E-commerce", 38, 1900000, 22, "active",
            "Bangalore, Karnataka", date(2024, 1, 12)),
    ]
}

#[rustfmt::skip]
fn candidate(
    id: i64, name: &str, email: &str, phone: &str, position: &str, experience: &str,
    skills: Vec<&str>, status: &str, salary: i64, recruiter: &str, client: &str,
    applied_date: NaiveDate, location: &str,
) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("email", email)
        .with("phone", phone)
        .with("position", position)
        .with("experience", experience)
        .with("skills", skills)
        .with("status", status)
        .with("salary", salary)
        .with("recruiter", recruiter)
        .with("client", client)
        .with("appliedDate", applied_date)
        .with("location", location)
}

pub fn sample_candidates() -> Vec<Record> {
    vec![
        candidate(1, "Aarav Joshi", "aarav.joshi@gmail.com", "+91 98765 77001",
            "Software Engineer", "3 years", vec!["React", "Node.js", "JavaScript", "MongoDB"],
            "hired", 800000, "Priya Sharma", "Tata Consultancy Services",
            date(2024, 1, 10), "Mumbai, Maharashtra"),
        candidate(2, "Diya Patel", "diya.patel@gmail.com", "+91 98765 77002",
            "Data Analyst", "2 years", vec!["Python", "SQL", "Power BI", "Excel"],
            "interview", 600000, "Rahul Kumar", "HDFC Bank",
            date(2024, 1, 8), "Mumbai, Maharashtra"),
        candidate(3, "Aryan Sharma", "aryan.sharma@gmail.com", "+91 98765 77003",
            "Marketing Manager", "5 years", vec!["Digital Marketing", "SEO", "Google Ads", "Analytics"],
            "pending", 1200000, "Anita Patel", "Flipkart",
            date(2024, 1, 5), "Bangalore, Karnataka"),
    ]
}

fn performance_month(month: &str, recruiters: i64, hired: i64, target: i64, revenue: i64) -> Record {
    Record::new()
        .with("month", month)
        .with("recruiters", recruiters)
        .with("hired", hired)
        .with("target", target)
        .with("revenue", revenue)
        .with("arpu", 50000)
}

pub fn sample_performance() -> Vec<Record> {
    vec![
        performance_month("Jan", 45, 123, 150, 6150000),
        performance_month("Feb", 52, 145, 150, 7250000),
        performance_month("Mar", 48, 132, 150, 6600000),
        performance_month("Apr", 61, 168, 150, 8400000),
        performance_month("May", 55, 155, 150, 7750000),
        performance_month("Jun", 58, 172, 150, 8600000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn provider() -> SampleDataProvider {
        SampleDataProvider::new(Duration::ZERO)
    }

    #[test]
    fn fetch_returns_full_lists() {
        let p = provider();
        assert_eq!(p.fetch(EntityKind::Recruiters).unwrap().len(), 8);
        assert_eq!(p.fetch(EntityKind::Clients).unwrap().len(), 5);
        assert_eq!(p.fetch(EntityKind::Candidates).unwrap().len(), 3);
        assert_eq!(p.fetch(EntityKind::Performance).unwrap().len(), 6);
    }

    #[test]
    fn recruiter_fields_are_typed() {
        let recruiters = sample_recruiters();
        let priya = &recruiters[0];
        assert_eq!(priya.get("name"), Some(&Value::Str("Priya Sharma".into())));
        assert_eq!(priya.get("hired"), Some(&Value::Num(25.0)));
        assert_eq!(
            priya.get("location").map(|v| v.display()),
            Some("Mumbai, Maharashtra".to_string())
        );
        assert!(matches!(priya.get("joinDate"), Some(Value::Date(_))));
    }

    #[test]
    fn candidate_skills_are_lists() {
        let candidates = sample_candidates();
        match candidates[0].get("skills") {
            Some(Value::List(skills)) => assert_eq!(skills.len(), 4),
            other => panic!("expected skills list, got {other:?}"),
        }
    }

    #[test]
    fn arpu_rounds_and_guards_zero() {
        assert_eq!(arpu(1250000.0, 25.0), 50000);
        assert_eq!(arpu(1000.0, 3.0), 333);
        assert_eq!(arpu(500.0, 3.0), 167);
        assert_eq!(arpu(100.0, 0.0), 0);
    }

    #[test]
    fn failing_provider_rejects() {
        assert!(FailingProvider.fetch(EntityKind::Recruiters).is_err());
    }
}
