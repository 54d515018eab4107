mod chat;
mod home;
mod job_detail;
mod job_list;
mod profile;

pub use chat::ChatView;
pub use home::HomeView;
pub use job_detail::JobDetailView;
pub use job_list::JobListView;
pub use profile::ProfileView;
