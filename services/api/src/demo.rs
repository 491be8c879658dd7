use crate::infra::in_memory_context;
use bootcamp::auth::{
    AccountFields, ApplicantRegistration, EmployeeRegistration, InstructorRegistration,
    LoginRequest, MemoryResumeStore, ResumeUpload,
};
use bootcamp::config::AppConfig;
use bootcamp::domain::{ApplicationState, BootcampDraft, BootcampState, UserView};
use bootcamp::error::AppError;
use bootcamp::paging::PagedRequest;
use bootcamp::services::ServiceError;
use chrono::{Duration, Local};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of extra bootcamps to create for the paging walkthrough.
    #[arg(long, default_value_t = 12)]
    pub(crate) extra_bootcamps: usize,
    /// Page size used when listing bootcamps.
    #[arg(long, default_value_t = 5)]
    pub(crate) page_size: i64,
    /// Skip the blacklist portion of the demo.
    #[arg(long)]
    pub(crate) skip_blacklist: bool,
}

fn account(first: &str, last: &str, email: &str) -> AccountFields {
    AccountFields {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        password: "demo-pass".to_string(),
    }
}

fn applicant(first: &str, email: &str) -> ApplicantRegistration {
    ApplicantRegistration {
        account: account(first, "Applicant", email),
        date_of_birth: "1998-05-21".to_string(),
        national_identity: "10000000146".to_string(),
        about: "Career switcher".to_string(),
    }
}

fn describe(view: &UserView) -> String {
    format!(
        "#{} {} {} <{}>",
        view.id, view.first_name, view.last_name, view.email
    )
}

fn outcome<T>(label: &str, result: Result<T, ServiceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            println!("  {label}: rejected ({err})");
            None
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        extra_bootcamps,
        page_size,
        skip_blacklist,
    } = args;

    let config = AppConfig::development();
    let resumes = Arc::new(MemoryResumeStore::new());
    let context = in_memory_context(Arc::clone(&resumes), &config);

    println!("Bootcamp management demo (in-memory store)");

    println!("\nRegistration");
    let instructor = context.auth.register_instructor(InstructorRegistration {
        account: account("Niklaus", "Wirth", "niklaus@example.com"),
        company_name: "ETH".to_string(),
    })?;
    println!("- instructor {}", describe(&instructor));
    let employee = context.auth.register_employee(EmployeeRegistration {
        account: account("Grace", "Hopper", "grace@example.com"),
        position: "Program coordinator".to_string(),
    })?;
    println!("- employee {}", describe(&employee));
    let ada = context.auth.register_applicant(
        applicant("Ada", "ada@example.com"),
        Some(ResumeUpload {
            file_name: "ada-cv.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: b"%PDF-1.4 demo".to_vec(),
        }),
    )?;
    println!(
        "- applicant {} (resume stored as {})",
        describe(&ada),
        resumes.references().join(", ")
    );
    outcome(
        "duplicate email",
        context
            .auth
            .register_employee(EmployeeRegistration {
                account: account("Ada", "Again", "ADA@example.com"),
                position: "Impostor".to_string(),
            }),
    );

    println!("\nLogin");
    let session = context.auth.login(&LoginRequest {
        email: "ada@example.com".to_string(),
        password: "demo-pass".to_string(),
    })?;
    match session {
        Some(session) => println!(
            "- {} signed in as {} (token expires {})",
            session.email,
            session.role.label(),
            session.expires_at
        ),
        None => println!("- login unexpectedly refused"),
    }
    let refused = context.auth.login(&LoginRequest {
        email: "ada@example.com".to_string(),
        password: "wrong".to_string(),
    })?;
    println!("- wrong password answered with a session: {}", refused.is_some());

    println!("\nBootcamp lifecycle");
    let today = Local::now().date_naive();
    let draft = |name: String| BootcampDraft {
        name,
        instructor_id: instructor.id,
        start_date: today + Duration::days(14),
        end_date: today + Duration::days(98),
    };
    let bootcamp = context.bootcamps.create(draft("Rust Backend".to_string()))?;
    println!(
        "- created '{}' in state {}",
        bootcamp.name,
        bootcamp.state.label()
    );

    println!("\nApplications");
    outcome(
        "apply while Preparing",
        context.applications.create(ada.id, bootcamp.id),
    );
    let bootcamp = context
        .bootcamps
        .update_state(bootcamp.id, BootcampState::Open)?;
    println!("- bootcamp moved to {}", bootcamp.state.label());
    let Some(application) = outcome(
        "apply while Open",
        context.applications.create(ada.id, bootcamp.id),
    ) else {
        return Ok(());
    };
    println!(
        "- application #{} is {}",
        application.id,
        application.state.label()
    );
    outcome(
        "second application",
        context.applications.create(ada.id, bootcamp.id),
    );
    println!(
        "- has applied: {}",
        context.applications.has_applied(ada.id, bootcamp.id)?
    );
    let approved = context
        .applications
        .update_status(application.id, ApplicationState::Approved)?;
    println!("- reviewed: {}", approved.state.label());
    outcome(
        "reopen approved application",
        context
            .applications
            .update_status(application.id, ApplicationState::Pending),
    );
    outcome(
        "move bootcamp back to Preparing",
        context
            .bootcamps
            .update_state(bootcamp.id, BootcampState::Preparing),
    );

    if !skip_blacklist {
        println!("\nBlacklist");
        let alan = context
            .auth
            .register_applicant(applicant("Alan", "alan@example.com"), None)?;
        let entry = context.blacklist.add(alan.id, "Repeated no-shows")?;
        println!(
            "- {} blacklisted (entry #{}: {})",
            alan.email, entry.id, entry.reason
        );
        outcome(
            "blacklisted applicant applies",
            context.applications.create(alan.id, bootcamp.id),
        );
        context.blacklist.remove(entry.id)?;
        if let Some(application) = outcome(
            "after removal",
            context.applications.create(alan.id, bootcamp.id),
        ) {
            println!(
                "- after removal the application is {}",
                application.state.label()
            );
        }
    }

    println!("\nPaging");
    for index in 1..=extra_bootcamps {
        context.bootcamps.create(draft(format!("Cohort {index}")))?;
    }
    let page = context
        .bootcamps
        .list_paged(PagedRequest::new(Some(2), Some(page_size)))?;
    println!(
        "- page {} of {} ({} bootcamps in total)",
        page.page_number, page.total_pages, page.total_count
    );
    for bootcamp in &page.items {
        println!("  - #{} {}", bootcamp.id, bootcamp.name);
    }

    Ok(())
}
