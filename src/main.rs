use std::{env, sync::Arc};

use barbershop_client::{
    HttpBookingApi, booking::BookingSession, calendar_view::CalendarController,
    config::ClientConfig,
};
use barbershop_core::{
    calendar::{DaySchedule, MonthRef, grid_weeks},
    context::Catalog,
    wizard::WizardConfig,
};
use chrono::{Local, NaiveDate};
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "usage: barbershop [YYYY-MM] | barbershop availability <barber-id> <YYYY-MM-DD> <service-id>";

enum Command {
    Calendar(MonthRef),
    Availability {
        barber_id: String,
        date: NaiveDate,
        service_id: String,
    },
}

fn parse_command(args: &[String], today: NaiveDate) -> Result<Command> {
    match args {
        [] => Ok(Command::Calendar(MonthRef::containing(today))),
        [month] => {
            let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
                .wrap_err_with(|| format!("Invalid month '{}'\n{}", month, USAGE))?;
            Ok(Command::Calendar(MonthRef::containing(first)))
        }
        [mode, barber_id, date, service_id] if mode == "availability" => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .wrap_err_with(|| format!("Invalid date '{}'", date))?;
            Ok(Command::Availability {
                barber_id: barber_id.clone(),
                date,
                service_id: service_id.clone(),
            })
        }
        _ => bail!(USAGE),
    }
}

async fn show_calendar(api: Arc<HttpBookingApi>, month: MonthRef, today: NaiveDate) -> Result<()> {
    let mut calendar = CalendarController::new(api, Arc::new(Catalog::english()), month);
    calendar.load().await;

    let first = month.first_day();
    println!("{}", first.format("%B %Y"));
    println!(" Mon  Tue  Wed  Thu  Fri  Sat  Sun");

    let grid = calendar.grid(today).await;
    for week in grid_weeks(&grid) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                let marker = if cell.is_today { '*' } else { ' ' };
                match (cell.in_current_month, cell.appointments.len()) {
                    (false, _) => "     ".to_string(),
                    (true, 0) => format!("{}{:>2}  ", marker, cell.date.format("%d")),
                    (true, n) => format!("{}{:>2}({})", marker, cell.date.format("%d"), n.min(9)),
                }
            })
            .collect();
        println!("{}", row.join(""));
    }

    for cell in grid.iter().filter(|c| c.in_current_month && !c.appointments.is_empty()) {
        let hours = match calendar.day_schedule(cell.date) {
            DaySchedule::Open { open, close } => {
                format!("{}-{}", open.format("%H:%M"), close.format("%H:%M"))
            }
            DaySchedule::Closed => "closed".to_string(),
        };
        println!();
        println!("{} ({})", cell.date.format("%a %d %b"), hours);

        for appointment in &cell.appointments {
            let barber = calendar
                .barber(&appointment.barber_id)
                .map(|b| b.full_name())
                .unwrap_or_else(|| appointment.barber_id.clone());
            let service = calendar
                .service(&appointment.service_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| appointment.service_id.clone());
            println!(
                "  {}  {:<10} {:<20} {:<20} {}",
                appointment.time().format("%H:%M"),
                appointment.status,
                appointment.customer_name,
                service,
                barber
            );
        }
    }

    Ok(())
}

async fn show_availability(
    api: Arc<HttpBookingApi>,
    barber_id: String,
    date: NaiveDate,
    service_id: String,
) -> Result<()> {
    let mut session = BookingSession::new(
        api,
        Arc::new(Catalog::english()),
        WizardConfig::for_barber(barber_id),
    );
    session.load().await;
    session.select_service(&service_id).await?;
    session.select_date(date).await?;

    let slots = session.wizard().slots();
    if slots.is_empty() {
        println!("No free slots on {}", date);
        return Ok(());
    }

    println!("Free slots on {}:", date);
    for slot in slots {
        println!("  {}", slot.format("%H:%M"));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ClientConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let today = Local::now().date_naive();
    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_command(&args, today)?;

    let api = HttpBookingApi::new(&config.api_base_url, config.session(), config.timeout())
        .map_err(|e| eyre!("Failed to create backend client: {}", e))?;
    info!(
        "Using backend {} for shop {}",
        config.api_base_url, config.shop_id
    );

    match command {
        Command::Calendar(month) => show_calendar(Arc::new(api), month, today).await,
        Command::Availability {
            barber_id,
            date,
            service_id,
        } => show_availability(Arc::new(api), barber_id, date, service_id).await,
    }
}
