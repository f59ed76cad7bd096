// Routes - Application URL paths
//
// These are the target application's contract, not ours. They are collected
// into one immutable value, built once and shared through `PageHandle`.

use regex::Regex;

/// Route map of the application under test
#[derive(Debug, Clone)]
pub struct Routes {
    pub login: String,
    pub dashboard: String,
    pub employee_list: String,
    pub add_employee: String,
    pub personal_details_prefix: String,
    pub job_details_prefix: String,
    pub apply_leave: String,
    pub assign_leave: String,
    pub leave_list: String,
    pub system_users: String,
    pub job_titles: String,
    pub save_job_title: String,
    pub candidates: String,
    pub add_candidate: String,
    pub candidate_status_change: String,
    pub vacancies: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self::orangehrm()
    }
}

impl Routes {
    /// Paths used by OrangeHRM 5.x
    pub fn orangehrm() -> Self {
        Self {
            login: "/auth/login".into(),
            dashboard: "/dashboard/index".into(),
            employee_list: "/pim/viewEmployeeList".into(),
            add_employee: "/pim/addEmployee".into(),
            personal_details_prefix: "/pim/viewPersonalDetails/empNumber/".into(),
            job_details_prefix: "/pim/viewJobDetails/empNumber/".into(),
            apply_leave: "/leave/applyLeave".into(),
            assign_leave: "/leave/assignLeave".into(),
            leave_list: "/leave/viewLeaveList".into(),
            system_users: "/admin/viewSystemUsers".into(),
            job_titles: "/admin/viewJobTitleList".into(),
            save_job_title: "/admin/saveJobTitle".into(),
            candidates: "/recruitment/viewCandidates".into(),
            add_candidate: "/recruitment/addCandidate".into(),
            candidate_status_change: "/recruitment/changeCandidateVacancyStatus".into(),
            vacancies: "/recruitment/viewJobVacancy".into(),
        }
    }

    pub fn personal_details(&self, emp_number: u64) -> String {
        format!("{}{}", self.personal_details_prefix, emp_number)
    }

    pub fn job_details(&self, emp_number: u64) -> String {
        format!("{}{}", self.job_details_prefix, emp_number)
    }

    /// Profile of an existing candidate (the add form, bound to an id)
    pub fn candidate_profile(&self, candidate_id: u64) -> String {
        format!("{}/{}", self.add_candidate, candidate_id)
    }

    /// Pattern matching any URL that ends in `path` (ignoring query and fragment).
    pub fn pattern(path: &str) -> Regex {
        Regex::new(&format!("{}(?:[?#].*)?$", regex::escape(path)))
            .expect("escaped path is a valid pattern")
    }

    /// Pattern matching any URL containing `fragment`.
    pub fn contains(fragment: &str) -> Regex {
        Regex::new(&regex::escape(fragment)).expect("escaped fragment is a valid pattern")
    }

    /// Extracts the candidate id from a candidate profile URL.
    pub fn candidate_id_from(&self, url: &str) -> Option<u64> {
        let prefix = format!("{}/", self.add_candidate);
        let rest = &url[url.find(&prefix)? + prefix.len()..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    /// Extracts the employee number from a personal/job details URL.
    pub fn emp_number_from(&self, url: &str) -> Option<u64> {
        let re = Regex::new(r"/empNumber/(\d+)").ok()?;
        re.captures(url)?.get(1)?.as_str().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matches_path_suffix() {
        let re = Routes::pattern("/pim/viewEmployeeList");
        assert!(re.is_match("https://demo/web/index.php/pim/viewEmployeeList"));
        assert!(re.is_match("https://demo/web/index.php/pim/viewEmployeeList?x=1"));
        assert!(!re.is_match("https://demo/web/index.php/pim/viewEmployeeListing"));
    }

    #[test]
    fn test_emp_number_from_details_url() {
        let routes = Routes::default();
        assert_eq!(
            routes.emp_number_from("https://demo/web/index.php/pim/viewPersonalDetails/empNumber/77"),
            Some(77)
        );
        assert_eq!(routes.emp_number_from("https://demo/web/index.php/pim/addEmployee"), None);
        assert_eq!(routes.job_details(5), "/pim/viewJobDetails/empNumber/5");
    }

    #[test]
    fn test_candidate_id_from_profile_url() {
        let routes = Routes::default();
        let url = format!("https://demo/web/index.php{}", routes.candidate_profile(42));
        assert_eq!(routes.candidate_id_from(&url), Some(42));
        assert_eq!(
            routes.candidate_id_from("https://demo/web/index.php/recruitment/addCandidate"),
            None
        );
    }
}
