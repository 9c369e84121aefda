use crate::data::{EntityKind, arpu};
use crate::domain::Page;
use crate::record::{ColumnSpec, Record, Value};

/// Configuration of one engine-driven table page: which entity it shows,
/// its columns, and the dropdown pre-filter keys cycled from the keyboard.
pub struct TablePageSpec {
    pub kind: EntityKind,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub columns: Vec<ColumnSpec>,
    pub prefilters: Vec<&'static str>,
}

fn num(value: &Value) -> f64 {
    value.as_num().unwrap_or(0.0)
}

fn render_lakh(value: &Value, _record: &Record) -> String {
    format!("₹{:.1}L", num(value) / 100000.0)
}

fn render_thousands(value: &Value, _record: &Record) -> String {
    format!("₹{:.0}K", num(value) / 1000.0)
}

fn render_trend(value: &Value, _record: &Record) -> String {
    match value.display().as_str() {
        "up" => "▲".to_string(),
        "down" => "▼".to_string(),
        other => other.to_string(),
    }
}

fn render_days(value: &Value, _record: &Record) -> String {
    format!("{} days", value.display())
}

/// Table page configuration for the pages backed by the view engine;
/// `None` for the chart/card pages.
pub fn table_page(page: Page) -> Option<TablePageSpec> {
    match page {
        Page::Recruiters => Some(TablePageSpec {
            kind: EntityKind::Recruiters,
            title: "Recruiter Management",
            subtitle: "Manage and track your recruitment team performance",
            columns: vec![
                ColumnSpec::new("name", "Recruiter Name", true),
                ColumnSpec::new("department", "Department", true),
                ColumnSpec::new("territory", "Territory", true),
                ColumnSpec::new("hired", "Hired", true),
                ColumnSpec::new("revenue", "Revenue", true).with_render(render_lakh),
                ColumnSpec::new("arpu", "ARPU", true).with_render(render_thousands),
                ColumnSpec::new("status", "Status", true),
                ColumnSpec::new("trend", "Trend", false).with_render(render_trend),
            ],
            prefilters: vec!["department", "territory"],
        }),
        Page::Clients => Some(TablePageSpec {
            kind: EntityKind::Clients,
            title: "Client Management",
            subtitle: "Track client accounts and hiring pipelines",
            columns: vec![
                ColumnSpec::new("company", "Company", true),
                ColumnSpec::new("name", "Contact", true),
                ColumnSpec::new("industry", "Industry", true),
                ColumnSpec::new("totalHired", "Hired", true),
                ColumnSpec::new("revenue", "Revenue", true).with_render(render_lakh),
                ColumnSpec::new("avgDaysToFill", "Avg Fill", true).with_render(render_days),
                ColumnSpec::new("status", "Status", true),
                ColumnSpec::new("lastActivity", "Last Activity", true),
            ],
            prefilters: vec!["industry", "status"],
        }),
        Page::Candidates => Some(TablePageSpec {
            kind: EntityKind::Candidates,
            title: "Candidate Pipeline",
            subtitle: "Follow candidates from application to hire",
            columns: vec![
                ColumnSpec::new("name", "Candidate", true),
                ColumnSpec::new("position", "Position", true),
                ColumnSpec::new("experience", "Experience", true),
                ColumnSpec::new("skills", "Skills", false),
                ColumnSpec::new("status", "Status", true),
                ColumnSpec::new("salary", "Salary", true).with_render(render_lakh),
                ColumnSpec::new("recruiter", "Recruiter", true),
                ColumnSpec::new("appliedDate", "Applied", true),
            ],
            prefilters: vec!["status", "position"],
        }),
        Page::Performance => Some(TablePageSpec {
            kind: EntityKind::Performance,
            title: "Performance Overview",
            subtitle: "Monthly hiring performance against targets",
            columns: vec![
                ColumnSpec::new("month", "Month", false),
                ColumnSpec::new("hired", "Hired", true),
                ColumnSpec::new("target", "Target", true),
                ColumnSpec::new("revenue", "Revenue", true).with_render(render_lakh),
                ColumnSpec::new("recruiters", "Recruiters", true),
                ColumnSpec::new("arpu", "ARPU", true).with_render(render_thousands),
            ],
            prefilters: vec![],
        }),
        _ => None,
    }
}

pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

fn sum_field(records: &[Record], key: &str) -> f64 {
    records
        .iter()
        .filter_map(|r| r.get(key).and_then(|v| v.as_num()))
        .sum()
}

fn count_status(records: &[Record], status: &str) -> usize {
    records
        .iter()
        .filter(|r| r.get("status").map(|v| v.display()) == Some(status.to_string()))
        .count()
}

fn crore(value: f64) -> String {
    format!("₹{:.1}Cr", value / 10000000.0)
}

/// Summary cards over the pre-filtered record set of a table page.
pub fn summary_cards(page: Page, records: &[Record]) -> Vec<StatCard> {
    match page {
        Page::Recruiters => {
            let hired = sum_field(records, "hired");
            let revenue = sum_field(records, "revenue");
            vec![
                StatCard { label: "Total Hired", value: format!("{hired:.0}") },
                StatCard {
                    label: "Active Recruiters",
                    value: count_status(records, "active").to_string(),
                },
                StatCard { label: "Total Revenue", value: crore(revenue) },
                StatCard {
                    label: "Average ARPU",
                    value: format!("₹{}K", arpu(revenue, hired) / 1000),
                },
            ]
        }
        Page::Clients => {
            let hired = sum_field(records, "totalHired");
            let revenue = sum_field(records, "revenue");
            let fill: f64 = sum_field(records, "avgDaysToFill");
            let avg_fill = if records.is_empty() { 0.0 } else { fill / records.len() as f64 };
            vec![
                StatCard { label: "Total Hired", value: format!("{hired:.0}") },
                StatCard {
                    label: "Active Clients",
                    value: count_status(records, "active").to_string(),
                },
                StatCard { label: "Total Revenue", value: crore(revenue) },
                StatCard { label: "Avg Days to Fill", value: format!("{avg_fill:.0}") },
            ]
        }
        Page::Candidates => {
            let salary = sum_field(records, "salary");
            let avg_salary = if records.is_empty() { 0.0 } else { salary / records.len() as f64 };
            vec![
                StatCard { label: "Candidates", value: records.len().to_string() },
                StatCard { label: "Hired", value: count_status(records, "hired").to_string() },
                StatCard {
                    label: "In Interview",
                    value: count_status(records, "interview").to_string(),
                },
                StatCard {
                    label: "Avg Salary",
                    value: format!("₹{:.1}L", avg_salary / 100000.0),
                },
            ]
        }
        Page::Performance | Page::Dashboard => {
            let hired = sum_field(records, "hired");
            let target = sum_field(records, "target");
            let revenue = sum_field(records, "revenue");
            let achievement = if target > 0.0 { hired * 100.0 / target } else { 0.0 };
            vec![
                StatCard { label: "Total Hired", value: format!("{hired:.0}") },
                StatCard { label: "Total Revenue", value: crore(revenue) },
                StatCard {
                    label: "Average ARPU",
                    value: format!("₹{}K", arpu(revenue, hired) / 1000),
                },
                StatCard { label: "Target Achievement", value: format!("{achievement:.0}%") },
            ]
        }
        _ => Vec::new(),
    }
}

// ---------------- Static page data (sample business content) ----------------

pub struct ActivityItem {
    pub recruiter: &'static str,
    pub action: &'static str,
    pub client: &'static str,
    pub time: &'static str,
}

pub fn recent_activity() -> Vec<ActivityItem> {
    vec![
        ActivityItem { recruiter: "Priya Sharma", action: "Hired candidate", client: "TCS", time: "2 hours ago" },
        ActivityItem { recruiter: "Rahul Kumar", action: "Interview scheduled", client: "HDFC Bank", time: "4 hours ago" },
        ActivityItem { recruiter: "Anita Patel", action: "New lead added", client: "Flipkart", time: "6 hours ago" },
        ActivityItem { recruiter: "Vikram Singh", action: "Client meeting", client: "Reliance", time: "8 hours ago" },
    ]
}

pub struct TopPerformer {
    pub name: &'static str,
    pub hired: u32,
    pub revenue: u64,
    pub location: &'static str,
}

pub fn top_performers() -> Vec<TopPerformer> {
    vec![
        TopPerformer { name: "Priya Sharma", hired: 25, revenue: 1250000, location: "Mumbai" },
        TopPerformer { name: "Karthik Krishnan", hired: 30, revenue: 1500000, location: "Bangalore" },
        TopPerformer { name: "Deepika Reddy", hired: 28, revenue: 1400000, location: "Hyderabad" },
        TopPerformer { name: "Anita Patel", hired: 22, revenue: 1100000, location: "Ahmedabad" },
    ]
}

pub struct PipelineSlice {
    pub name: &'static str,
    pub value: u32,
}

pub fn pipeline_breakdown() -> Vec<PipelineSlice> {
    vec![
        PipelineSlice { name: "Hired", value: 68 },
        PipelineSlice { name: "In Process", value: 22 },
        PipelineSlice { name: "Pending", value: 10 },
    ]
}

pub struct ScheduleEntry {
    pub kind: &'static str,
    pub title: &'static str,
    pub interviewer: &'static str,
    pub time: &'static str,
    pub duration: &'static str,
    pub mode: &'static str,
    pub status: &'static str,
    pub client: &'static str,
}

pub fn today_schedule() -> Vec<ScheduleEntry> {
    vec![
        ScheduleEntry {
            kind: "interview", title: "Technical Interview - Aarav Joshi",
            interviewer: "Priya Sharma", time: "10:00 AM", duration: "1 hour",
            mode: "video", status: "scheduled", client: "TCS",
        },
        ScheduleEntry {
            kind: "meeting", title: "Client Meeting - HDFC Bank",
            interviewer: "Rahul Kumar", time: "2:00 PM", duration: "45 minutes",
            mode: "office", status: "confirmed", client: "HDFC Bank",
        },
        ScheduleEntry {
            kind: "interview", title: "HR Round - Diya Patel",
            interviewer: "Anita Patel", time: "4:30 PM", duration: "30 minutes",
            mode: "video", status: "pending", client: "HDFC Bank",
        },
    ]
}

pub struct UpcomingInterview {
    pub candidate: &'static str,
    pub position: &'static str,
    pub time: &'static str,
    pub interviewer: &'static str,
    pub client: &'static str,
}

pub struct UpcomingDay {
    pub date: &'static str,
    pub interviews: Vec<UpcomingInterview>,
}

pub fn upcoming_interviews() -> Vec<UpcomingDay> {
    vec![
        UpcomingDay {
            date: "Tomorrow",
            interviews: vec![
                UpcomingInterview { candidate: "Aryan Sharma", position: "Marketing Manager", time: "11:00 AM", interviewer: "Vikram Singh", client: "Flipkart" },
                UpcomingInterview { candidate: "Sneha Gupta", position: "Business Analyst", time: "3:00 PM", interviewer: "Deepika Reddy", client: "Reliance" },
            ],
        },
        UpcomingDay {
            date: "Day After Tomorrow",
            interviews: vec![
                UpcomingInterview { candidate: "Karthik Nair", position: "DevOps Engineer", time: "10:30 AM", interviewer: "Priya Sharma", client: "TCS" },
            ],
        },
    ]
}

pub struct InterviewStats {
    pub total_today: u32,
    pub completed: u32,
    pub upcoming: u32,
    pub cancelled: u32,
    pub success_rate: u32,
}

pub fn interview_stats() -> InterviewStats {
    InterviewStats { total_today: 8, completed: 3, upcoming: 5, cancelled: 0, success_rate: 87 }
}

pub struct ReportDef {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: &'static str,
    pub last_generated: &'static str,
    pub frequency: &'static str,
    pub format: &'static str,
    pub status: &'static str,
}

pub fn available_reports() -> Vec<ReportDef> {
    vec![
        ReportDef { name: "Monthly Hiring Report", description: "Comprehensive monthly hiring statistics and performance metrics", kind: "Scheduled", last_generated: "2024-01-15", frequency: "Monthly", format: "PDF", status: "Active" },
        ReportDef { name: "Recruiter Performance Analysis", description: "Individual recruiter performance metrics and KPIs", kind: "On-Demand", last_generated: "2024-01-14", frequency: "As Needed", format: "Excel", status: "Active" },
        ReportDef { name: "Client Satisfaction Survey", description: "Client feedback and satisfaction scores", kind: "Scheduled", last_generated: "2024-01-10", frequency: "Quarterly", format: "PDF", status: "Active" },
        ReportDef { name: "Salary Benchmarking Report", description: "Market salary analysis and compensation benchmarks", kind: "On-Demand", last_generated: "2024-01-08", frequency: "As Needed", format: "Excel", status: "Draft" },
        ReportDef { name: "Diversity & Inclusion Metrics", description: "D&I statistics and progress tracking", kind: "Scheduled", last_generated: "2024-01-05", frequency: "Monthly", format: "PDF", status: "Active" },
    ]
}

pub struct RecentReport {
    pub name: &'static str,
    pub generated_on: &'static str,
    pub size: &'static str,
    pub downloads: u32,
    pub format: &'static str,
}

pub fn recent_reports() -> Vec<RecentReport> {
    vec![
        RecentReport { name: "January 2024 Hiring Summary", generated_on: "2024-01-15 10:30 AM", size: "2.3 MB", downloads: 12, format: "PDF" },
        RecentReport { name: "Q4 2023 Performance Review", generated_on: "2024-01-10 02:15 PM", size: "1.8 MB", downloads: 8, format: "Excel" },
        RecentReport { name: "December Client Feedback", generated_on: "2024-01-08 09:45 AM", size: "1.2 MB", downloads: 15, format: "PDF" },
        RecentReport { name: "Recruiter KPI Analysis", generated_on: "2024-01-05 04:20 PM", size: "3.1 MB", downloads: 6, format: "Excel" },
    ]
}

pub struct ReportTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub estimated_time: &'static str,
}

pub fn report_templates() -> Vec<ReportTemplate> {
    vec![
        ReportTemplate { name: "Executive Summary", description: "High-level overview for leadership", category: "Management", estimated_time: "5 mins" },
        ReportTemplate { name: "Detailed Analytics", description: "In-depth analysis with charts and metrics", category: "Analytics", estimated_time: "15 mins" },
        ReportTemplate { name: "Operational Report", description: "Day-to-day operational insights", category: "Operations", estimated_time: "8 mins" },
        ReportTemplate { name: "Financial Summary", description: "Revenue and cost analysis", category: "Finance", estimated_time: "10 mins" },
    ]
}

pub struct OrgTarget {
    pub title: &'static str,
    pub description: &'static str,
    pub target: f64,
    pub achieved: f64,
    pub period: &'static str,
    pub status: &'static str,
    pub department: &'static str,
    pub deadline: &'static str,
}

impl OrgTarget {
    pub fn percentage(&self) -> f64 {
        if self.target > 0.0 {
            self.achieved * 100.0 / self.target
        } else {
            0.0
        }
    }
}

pub fn organizational_targets() -> Vec<OrgTarget> {
    vec![
        OrgTarget { title: "Monthly Hiring Target", description: "Total hires across all departments", target: 150.0, achieved: 142.0, period: "January 2024", status: "on-track", department: "All", deadline: "2024-01-31" },
        OrgTarget { title: "Revenue Target", description: "Monthly revenue from all hirings", target: 7500000.0, achieved: 7100000.0, period: "January 2024", status: "at-risk", department: "All", deadline: "2024-01-31" },
        OrgTarget { title: "Client Acquisition", description: "New clients onboarded", target: 5.0, achieved: 3.0, period: "Q1 2024", status: "behind", department: "Business Development", deadline: "2024-03-31" },
        OrgTarget { title: "Quality Score", description: "Average hiring quality rating", target: 9.0, achieved: 8.7, period: "January 2024", status: "on-track", department: "All", deadline: "2024-01-31" },
    ]
}

pub struct DeptTarget {
    pub department: &'static str,
    pub target: u32,
    pub achieved: u32,
    pub percentage: u32,
    pub trend: &'static str,
    pub recruiters: u32,
}

pub fn department_targets() -> Vec<DeptTarget> {
    vec![
        DeptTarget { department: "Technology", target: 50, achieved: 48, percentage: 96, trend: "up", recruiters: 8 },
        DeptTarget { department: "Banking", target: 40, achieved: 38, percentage: 95, trend: "up", recruiters: 6 },
        DeptTarget { department: "Healthcare", target: 35, achieved: 32, percentage: 91, trend: "down", recruiters: 5 },
        DeptTarget { department: "Manufacturing", target: 25, achieved: 24, percentage: 96, trend: "up", recruiters: 4 },
    ]
}

pub struct DeptPerformance {
    pub department: &'static str,
    pub hired: u32,
    pub target: u32,
    pub achievement: u32,
}

pub fn department_performance() -> Vec<DeptPerformance> {
    vec![
        DeptPerformance { department: "Technology", hired: 45, target: 50, achievement: 90 },
        DeptPerformance { department: "Banking", hired: 38, target: 40, achievement: 95 },
        DeptPerformance { department: "Healthcare", hired: 32, target: 35, achievement: 91 },
        DeptPerformance { department: "Manufacturing", hired: 28, target: 30, achievement: 93 },
        DeptPerformance { department: "IT Services", hired: 42, target: 45, achievement: 93 },
        DeptPerformance { department: "Consulting", hired: 25, target: 25, achievement: 100 },
    ]
}

pub struct RegionPerformance {
    pub region: &'static str,
    pub hired: u32,
    pub revenue: u64,
}

pub fn region_performance() -> Vec<RegionPerformance> {
    vec![
        RegionPerformance { region: "Mumbai", hired: 78, revenue: 3900000 },
        RegionPerformance { region: "Bangalore", hired: 65, revenue: 3250000 },
        RegionPerformance { region: "Delhi", hired: 58, revenue: 2900000 },
        RegionPerformance { region: "Hyderabad", hired: 52, revenue: 2600000 },
        RegionPerformance { region: "Pune", hired: 45, revenue: 2250000 },
        RegionPerformance { region: "Chennai", hired: 42, revenue: 2100000 },
    ]
}

pub struct HiringTrend {
    pub month: &'static str,
    pub technology: u32,
    pub banking: u32,
    pub healthcare: u32,
    pub manufacturing: u32,
}

pub fn hiring_trends() -> Vec<HiringTrend> {
    vec![
        HiringTrend { month: "Jan", technology: 45, banking: 32, healthcare: 28, manufacturing: 22 },
        HiringTrend { month: "Feb", technology: 52, banking: 38, healthcare: 31, manufacturing: 25 },
        HiringTrend { month: "Mar", technology: 48, banking: 35, healthcare: 29, manufacturing: 23 },
        HiringTrend { month: "Apr", technology: 61, banking: 42, healthcare: 35, manufacturing: 28 },
        HiringTrend { month: "May", technology: 55, banking: 39, healthcare: 32, manufacturing: 26 },
        HiringTrend { month: "Jun", technology: 58, banking: 41, healthcare: 34, manufacturing: 29 },
    ]
}

pub struct SalaryBand {
    pub range: &'static str,
    pub count: u32,
    pub percentage: u32,
}

pub fn salary_distribution() -> Vec<SalaryBand> {
    vec![
        SalaryBand { range: "2-5L", count: 45, percentage: 25 },
        SalaryBand { range: "5-8L", count: 68, percentage: 38 },
        SalaryBand { range: "8-12L", count: 42, percentage: 23 },
        SalaryBand { range: "12-18L", count: 18, percentage: 10 },
        SalaryBand { range: "18L+", count: 7, percentage: 4 },
    ]
}

pub struct SkillDemand {
    pub skill: &'static str,
    pub demand: u32,
    pub supply: u32,
    pub gap: u32,
}

pub fn skill_demand() -> Vec<SkillDemand> {
    vec![
        SkillDemand { skill: "React", demand: 95, supply: 70, gap: 25 },
        SkillDemand { skill: "Python", demand: 90, supply: 80, gap: 10 },
        SkillDemand { skill: "Java", demand: 85, supply: 85, gap: 0 },
        SkillDemand { skill: "Node.js", demand: 80, supply: 60, gap: 20 },
        SkillDemand { skill: "AWS", demand: 88, supply: 55, gap: 33 },
        SkillDemand { skill: "Angular", demand: 75, supply: 65, gap: 10 },
    ]
}

pub struct RegionShare {
    pub name: &'static str,
    pub value: u32,
}

pub fn region_split() -> Vec<RegionShare> {
    vec![
        RegionShare { name: "Mumbai", value: 28 },
        RegionShare { name: "Bangalore", value: 24 },
        RegionShare { name: "Delhi", value: 18 },
        RegionShare { name: "Hyderabad", value: 15 },
        RegionShare { name: "Pune", value: 10 },
        RegionShare { name: "Others", value: 5 },
    ]
}

pub struct RadarMetric {
    pub metric: &'static str,
    pub value: u32,
}

pub fn performance_radar() -> Vec<RadarMetric> {
    vec![
        RadarMetric { metric: "Hiring Speed", value: 85 },
        RadarMetric { metric: "Quality", value: 92 },
        RadarMetric { metric: "Cost Efficiency", value: 78 },
        RadarMetric { metric: "Client Satisfaction", value: 88 },
        RadarMetric { metric: "Retention", value: 90 },
        RadarMetric { metric: "Time to Fill", value: 82 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_candidates, sample_clients, sample_performance, sample_recruiters};

    #[test]
    fn table_pages_exist_for_engine_pages() {
        for page in [Page::Recruiters, Page::Clients, Page::Candidates, Page::Performance] {
            assert!(table_page(page).is_some(), "missing spec for {page:?}");
        }
        assert!(table_page(Page::Dashboard).is_none());
        assert!(table_page(Page::Schedule).is_none());
    }

    #[test]
    fn column_keys_resolve_against_sample_records() {
        let cases = [
            (Page::Recruiters, sample_recruiters()),
            (Page::Clients, sample_clients()),
            (Page::Candidates, sample_candidates()),
            (Page::Performance, sample_performance()),
        ];
        for (page, records) in cases {
            let spec = table_page(page).unwrap();
            for column in &spec.columns {
                for record in &records {
                    assert!(
                        record.get(column.key).is_some(),
                        "{page:?}: column {} missing in a sample record",
                        column.key
                    );
                }
            }
            for key in &spec.prefilters {
                assert!(records[0].get(key).is_some(), "{page:?}: prefilter {key}");
            }
        }
    }

    #[test]
    fn recruiter_summary_cards() {
        let cards = summary_cards(Page::Recruiters, &sample_recruiters());
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].value, "170");
        assert_eq!(cards[1].value, "8");
        assert_eq!(cards[2].value, "₹0.8Cr");
        assert_eq!(cards[3].value, "₹50K");
    }

    #[test]
    fn performance_summary_cards() {
        let cards = summary_cards(Page::Performance, &sample_performance());
        assert_eq!(cards[0].value, "895");
        assert_eq!(cards[3].value, "99%");
    }

    #[test]
    fn org_target_percentage() {
        let targets = organizational_targets();
        assert!((targets[0].percentage() - 94.66).abs() < 0.1);
        let zero = OrgTarget {
            title: "x", description: "", target: 0.0, achieved: 1.0,
            period: "", status: "", department: "", deadline: "",
        };
        assert_eq!(zero.percentage(), 0.0);
    }
}
