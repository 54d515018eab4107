//! Seed records served by the mock service.

use super::types::{Application, ExperienceLevel, Job, JobType, Profile, Stat};

struct JobRow {
  title: &'static str,
  company: &'static str,
  location: &'static str,
  job_type: JobType,
  experience: ExperienceLevel,
  salary: &'static str,
  posted: &'static str,
  compatibility: u8,
  tags: &'static [&'static str],
}

use ExperienceLevel::{Entry, Lead, Mid, Senior};
use JobType::{Contract, FullTime, Internship, PartTime};

const JOB_ROWS: &[JobRow] = &[
  JobRow { title: "Senior Frontend Developer", company: "TechCorp Inc.", location: "San Francisco, CA", job_type: FullTime, experience: Senior, salary: "$140k - $180k", posted: "2 days ago", compatibility: 95, tags: &["React", "TypeScript", "GraphQL"] },
  JobRow { title: "Lead Developer", company: "StartupXYZ", location: "Remote", job_type: FullTime, experience: Lead, salary: "$160k - $200k", posted: "1 day ago", compatibility: 88, tags: &["Node.js", "React", "AWS"] },
  JobRow { title: "Frontend Engineer", company: "DataTech Solutions", location: "New York, NY", job_type: FullTime, experience: Mid, salary: "$120k - $150k", posted: "3 days ago", compatibility: 91, tags: &["Vue", "JavaScript", "CSS"] },
  JobRow { title: "Product Manager", company: "InnovateLabs", location: "Austin, TX", job_type: FullTime, experience: Senior, salary: "$130k - $170k", posted: "5 days ago", compatibility: 62, tags: &["Product", "Agile", "Roadmaps"] },
  JobRow { title: "Data Scientist", company: "Quantify AI", location: "Boston, MA", job_type: FullTime, experience: Mid, salary: "$125k - $160k", posted: "1 week ago", compatibility: 58, tags: &["Python", "Machine Learning", "SQL"] },
  JobRow { title: "UX Designer", company: "PixelPerfect Studio", location: "Remote", job_type: Contract, experience: Mid, salary: "$80 - $110 / hr", posted: "4 days ago", compatibility: 74, tags: &["Figma", "User Research", "Prototyping"] },
  JobRow { title: "Backend Engineer", company: "CloudNine Systems", location: "Seattle, WA", job_type: FullTime, experience: Senior, salary: "$150k - $190k", posted: "6 days ago", compatibility: 70, tags: &["Rust", "Go", "Kubernetes"] },
  JobRow { title: "Junior Web Developer", company: "BrightPath Media", location: "Chicago, IL", job_type: FullTime, experience: Entry, salary: "$65k - $80k", posted: "2 days ago", compatibility: 80, tags: &["HTML", "CSS", "JavaScript"] },
  JobRow { title: "Full Stack Developer", company: "Nimbus Health", location: "Remote (US)", job_type: FullTime, experience: Mid, salary: "$115k - $145k", posted: "1 day ago", compatibility: 86, tags: &["React", "Node.js", "PostgreSQL"] },
  JobRow { title: "Mobile Developer", company: "AppForge", location: "Los Angeles, CA", job_type: Contract, experience: Mid, salary: "$90 - $120 / hr", posted: "2 weeks ago", compatibility: 66, tags: &["React Native", "iOS", "Android"] },
  JobRow { title: "DevOps Engineer", company: "CloudNine Systems", location: "Remote", job_type: FullTime, experience: Senior, salary: "$145k - $185k", posted: "3 days ago", compatibility: 55, tags: &["AWS", "Terraform", "CI/CD"] },
  JobRow { title: "Frontend Developer Intern", company: "TechCorp Inc.", location: "San Francisco, CA", job_type: Internship, experience: Entry, salary: "$35 / hr", posted: "1 week ago", compatibility: 77, tags: &["React", "JavaScript", "Git"] },
  JobRow { title: "Design Systems Engineer", company: "PixelPerfect Studio", location: "Portland, OR", job_type: FullTime, experience: Senior, salary: "$135k - $165k", posted: "5 days ago", compatibility: 93, tags: &["React", "Storybook", "Accessibility"] },
  JobRow { title: "QA Automation Engineer", company: "Reliant Software", location: "Denver, CO", job_type: FullTime, experience: Mid, salary: "$95k - $120k", posted: "4 days ago", compatibility: 60, tags: &["Cypress", "Playwright", "JavaScript"] },
  JobRow { title: "Machine Learning Engineer", company: "Quantify AI", location: "Remote", job_type: FullTime, experience: Senior, salary: "$170k - $210k", posted: "2 days ago", compatibility: 52, tags: &["Python", "PyTorch", "MLOps"] },
  JobRow { title: "Technical Writer", company: "DocuWorks", location: "Remote", job_type: PartTime, experience: Mid, salary: "$45 - $60 / hr", posted: "3 weeks ago", compatibility: 48, tags: &["Documentation", "APIs", "Markdown"] },
  JobRow { title: "Engineering Manager", company: "Nimbus Health", location: "Boston, MA", job_type: FullTime, experience: Lead, salary: "$180k - $220k", posted: "1 week ago", compatibility: 69, tags: &["Leadership", "Hiring", "Agile"] },
  JobRow { title: "React Developer", company: "ShopStream", location: "Miami, FL", job_type: Contract, experience: Mid, salary: "$70 - $95 / hr", posted: "6 days ago", compatibility: 90, tags: &["React", "Redux", "TypeScript"] },
  JobRow { title: "Security Engineer", company: "Fortress Cyber", location: "Washington, DC", job_type: FullTime, experience: Senior, salary: "$155k - $195k", posted: "2 weeks ago", compatibility: 45, tags: &["Security", "Penetration Testing", "Cloud"] },
  JobRow { title: "Data Analyst", company: "InsightWorks", location: "Atlanta, GA", job_type: FullTime, experience: Entry, salary: "$70k - $90k", posted: "3 days ago", compatibility: 57, tags: &["SQL", "Tableau", "Excel"] },
  JobRow { title: "UI Engineer", company: "ShopStream", location: "Remote", job_type: FullTime, experience: Mid, salary: "$120k - $140k", posted: "5 days ago", compatibility: 89, tags: &["CSS", "TypeScript", "Animation"] },
  JobRow { title: "Platform Engineer", company: "Reliant Software", location: "Austin, TX", job_type: FullTime, experience: Senior, salary: "$150k - $180k", posted: "1 week ago", compatibility: 63, tags: &["Go", "Kubernetes", "Observability"] },
  JobRow { title: "Product Designer", company: "InnovateLabs", location: "New York, NY", job_type: FullTime, experience: Senior, salary: "$130k - $160k", posted: "4 days ago", compatibility: 72, tags: &["Figma", "Design Systems", "UX"] },
  JobRow { title: "Customer Success Engineer", company: "DataTech Solutions", location: "Chicago, IL", job_type: PartTime, experience: Entry, salary: "$30 - $40 / hr", posted: "2 days ago", compatibility: 50, tags: &["Support", "SQL", "APIs"] },
  JobRow { title: "Staff Frontend Engineer", company: "Streamline", location: "Remote (Global)", job_type: FullTime, experience: Lead, salary: "$190k - $230k", posted: "1 day ago", compatibility: 92, tags: &["React", "Performance", "Architecture"] },
  JobRow { title: "Cloud Architect", company: "CloudNine Systems", location: "Seattle, WA", job_type: Contract, experience: Lead, salary: "$120 - $150 / hr", posted: "3 weeks ago", compatibility: 54, tags: &["AWS", "Azure", "Architecture"] },
  JobRow { title: "Data Engineering Intern", company: "InsightWorks", location: "Atlanta, GA", job_type: Internship, experience: Entry, salary: "$28 / hr", posted: "1 week ago", compatibility: 59, tags: &["Python", "Airflow", "SQL"] },
  JobRow { title: "Accessibility Specialist", company: "Streamline", location: "Toronto, ON", job_type: PartTime, experience: Mid, salary: "$55 - $75 / hr", posted: "6 days ago", compatibility: 81, tags: &["Accessibility", "WCAG", "HTML"] },
  JobRow { title: "Growth Engineer", company: "StartupXYZ", location: "San Francisco, CA", job_type: FullTime, experience: Mid, salary: "$130k - $155k", posted: "4 days ago", compatibility: 78, tags: &["Experimentation", "React", "Analytics"] },
  JobRow { title: "Site Reliability Engineer", company: "Fortress Cyber", location: "Remote", job_type: FullTime, experience: Senior, salary: "$160k - $190k", posted: "2 days ago", compatibility: 51, tags: &["Linux", "Prometheus", "On-call"] },
];

/// The 30 postings the mock service lists
pub fn jobs() -> Vec<Job> {
  JOB_ROWS
    .iter()
    .enumerate()
    .map(|(i, row)| Job {
      id: (i + 1).to_string(),
      title: row.title.to_string(),
      company: row.company.to_string(),
      logo: crate::text::get_initials(row.company, 2),
      location: row.location.to_string(),
      job_type: row.job_type,
      experience: row.experience,
      salary: row.salary.to_string(),
      posted: row.posted.to_string(),
      description: format!(
        "{} is looking for a {} to join the team. You will work with {} and ship \
         features used by thousands of customers every day.",
        row.company,
        row.title,
        row.tags.join(", ")
      ),
      tags: row.tags.iter().map(|t| t.to_string()).collect(),
      compatibility: row.compatibility,
    })
    .collect()
}

pub fn profile() -> Profile {
  Profile {
    name: "Sarah Johnson".to_string(),
    title: "Senior Frontend Developer".to_string(),
    email: "sarah.johnson@email.com".to_string(),
    phone: "+1 (555) 123-4567".to_string(),
    location: "San Francisco, CA".to_string(),
    experience: "6 years".to_string(),
    education: "BS Computer Science, Stanford University".to_string(),
    bio: "Passionate frontend developer with expertise in React, TypeScript, and modern web \
          technologies. Love creating beautiful, accessible user interfaces that provide \
          exceptional user experiences."
      .to_string(),
  }
}

pub fn profile_stats() -> Vec<Stat> {
  [
    ("Profile Views", "234", "Eye"),
    ("Applications", "12", "FileText"),
    ("Saved Jobs", "18", "Heart"),
    ("Interviews", "3", "Briefcase"),
  ]
  .into_iter()
  .map(|(label, value, icon)| Stat {
    label: label.to_string(),
    value: value.to_string(),
    icon: icon.to_string(),
  })
  .collect()
}

pub fn applications() -> Vec<Application> {
  [
    (
      "1",
      "TechCorp Inc.",
      "Senior Frontend Developer",
      "Interview Scheduled",
      "2024-01-15",
      "blue",
    ),
    ("2", "StartupXYZ", "Lead Developer", "Under Review", "2024-01-12", "orange"),
    ("3", "DataTech Solutions", "Frontend Engineer", "Applied", "2024-01-10", "green"),
  ]
  .into_iter()
  .map(|(id, company, position, status, date, color)| Application {
    id: id.to_string(),
    company: company.to_string(),
    position: position.to_string(),
    status: status.to_string(),
    date: date.to_string(),
    status_color: color.to_string(),
  })
  .collect()
}

pub const SKILLS: &[&str] = &[
  "React",
  "TypeScript",
  "JavaScript",
  "CSS",
  "HTML",
  "Node.js",
  "GraphQL",
  "Git",
];
