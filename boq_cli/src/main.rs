//! # Takhmina CLI Application
//!
//! Terminal front end for the estimation engine: prompts for a project
//! specification, runs the engine, and prints the itemized BOQ plus the
//! JSON result for API/LLM consumers.

use std::io::{self, BufRead, Write};

use boq_core::breakdown::LineRole;
use boq_core::catalog::RateCatalog;
use boq_core::estimate::estimate;
use boq_core::project::ProjectSpecification;
use boq_core::units::Pkr;

fn prompt_string(prompt: &str, default: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default.to_string();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default.to_string();
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    let mut input = String::new();
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }
    input.trim().parse().unwrap_or(default)
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    let mut input = String::new();
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }
    input.trim().parse().unwrap_or(default)
}

fn main() {
    println!("Takhmina CLI - Construction Cost Estimator");
    println!("==========================================");
    println!();

    let catalog = RateCatalog::builtin();
    let city_names: Vec<&str> = catalog.cities.iter().map(|c| c.name.as_str()).collect();
    println!("Known cities: {}", city_names.join(", "));
    println!();

    let project_name = prompt_string("Project name [My House]: ", "My House");
    let area = prompt_f64("Total area (sq.ft) [1000]: ", 1000.0);
    let location = prompt_string("Location [Karachi]: ", "Karachi");
    let floors = prompt_u32("Number of floors [1]: ", 1);
    let rooms = prompt_u32("Number of rooms [4]: ", 4);
    let room_length = prompt_f64("Room length (ft) [10]: ", 10.0);
    let room_width = prompt_f64("Room width (ft) [12]: ", 12.0);
    let quality = prompt_string("Material quality (standard/premium/luxury) [standard]: ", "standard");
    let finishes = prompt_string("Include finishes? (yes/no) [no]: ", "no");

    let mut spec = ProjectSpecification::new(project_name, area, location)
        .with_rooms(rooms, room_length, room_width)
        .with_quality(quality)
        .with_floors(floors);

    if finishes.eq_ignore_ascii_case("yes") || finishes.eq_ignore_ascii_case("y") {
        let finishes_quality = prompt_string(
            "Finishes quality (standard/premium/luxury) [standard]: ",
            "standard",
        );
        spec = spec.with_finishes(finishes_quality);
    }

    println!();
    match estimate(&spec, catalog) {
        Ok(result) => {
            println!("═══════════════════════════════════════════════");
            println!("  ESTIMATE: {}", spec.project_name);
            println!("═══════════════════════════════════════════════");
            if let Some(pct) = result.utilization_percent {
                println!("  Room area uses {:.1}% of project area", pct);
            }
            println!("  Estimated duration: {} days", result.duration_days);
            println!("  Accuracy: {}", result.accuracy);
            println!();

            for section in &result.breakdown.sections {
                println!("  {}: {}", section.category, Pkr(section.subtotal));
                for item in &section.items {
                    let marker = match item.role {
                        LineRole::Driver => "*",
                        LineRole::Illustrative => " ",
                    };
                    println!(
                        "    {} {:<22} {:<28} {:>14}",
                        marker,
                        item.description,
                        item.quantity_display,
                        Pkr(item.amount).to_string(),
                    );
                }
                println!();
            }

            println!("  (* lines sum into the total; others are context)");
            println!("───────────────────────────────────────────────");
            println!("  Material cost:   {:>18}", Pkr(result.material_cost).to_string());
            println!("  Labor cost:      {:>18}", Pkr(result.labor_cost).to_string());
            println!("  Equipment cost:  {:>18}", Pkr(result.equipment_cost).to_string());
            println!("  Finishes cost:   {:>18}", Pkr(result.finishes_cost).to_string());
            println!("  Other costs:     {:>18}", Pkr(result.other_costs).to_string());
            println!("═══════════════════════════════════════════════");
            println!("  TOTAL:           {:>18}", Pkr(result.total_cost).to_string());
            println!("═══════════════════════════════════════════════");

            println!();
            println!("JSON Output (for API/LLM use):");
            if let Ok(json) = serde_json::to_string_pretty(&result) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }
}
