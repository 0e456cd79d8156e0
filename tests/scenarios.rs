use service_parser_core::{
    evaluate, DetectionMethod, EvaluationCase, ParseResult, ServiceParser, ServiceType,
};

fn parse(text: &str) -> ParseResult {
    ServiceParser::new().unwrap().parse(text)
}

fn names(parts: &[service_parser_core::ExtractedPart]) -> Vec<&str> {
    parts.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn oil_and_filter_with_cost_and_odometer() {
    let result = parse("Changed oil filter and engine oil for 1200 rupees at 15000 km");
    let replaced = names(&result.parts_replaced);
    assert!(replaced.contains(&"Engine Oil"));
    assert!(replaced.contains(&"Oil Filter"));
    assert_eq!(result.total_cost, 1200.0);
    assert_eq!(result.odometer_reading, Some(15000));
    assert!(result.parsed_successfully);
}

#[test]
fn brake_pads_front_and_rear() {
    let result = parse("Replaced brake pads front and rear, total 3000 rupees");
    let pads = result
        .parts_replaced
        .iter()
        .find(|p| p.id == "brake_pad")
        .expect("brake pads detected");
    assert_eq!(pads.name, "Brake Pads");
    assert_eq!(pads.quantity, 2);
    assert_eq!(result.total_cost, 3000.0);
}

#[test]
fn full_service_list() {
    let result = parse("Full service with air filter, oil filter, engine oil change. 2500 rupees");
    let replaced = names(&result.parts_replaced);
    for expected in ["Air Filter", "Oil Filter", "Engine Oil"] {
        assert!(replaced.contains(&expected), "missing {expected}");
    }
    assert_eq!(result.total_cost, 2500.0);
    assert_eq!(result.service_type, ServiceType::RegularService);
}

#[test]
fn empty_transcript() {
    let result = parse("");
    assert!(!result.parsed_successfully);
    assert_eq!(result.confidence_score, 0.0);
    assert!(result.parts_replaced.is_empty());
    assert!(result.parts_repaired.is_empty());
    assert_eq!(result.total_cost, 0.0);
    assert_eq!(result.labor_cost, 0.0);
    assert_eq!(result.parts_cost, 0.0);
    assert_eq!(result.odometer_reading, None);
    assert_eq!(result.work_summary, "No transcript provided");
}

#[test]
fn bare_large_number_is_not_a_cost() {
    assert_eq!(parse("5000000").total_cost, 0.0);
}

#[test]
fn brake_job_with_discs_and_fluid() {
    let result = parse(
        "Replaced front brake pads and brake discs. Also changed brake fluid. \
         Total cost 5000 rupees at 30000 km.",
    );
    let replaced = names(&result.parts_replaced);
    for expected in ["Brake Pads", "Brake Disc", "Brake Fluid"] {
        assert!(replaced.contains(&expected), "missing {expected}");
    }
    assert_eq!(result.total_cost, 5000.0);
    assert_eq!(result.odometer_reading, Some(30000));
}

#[test]
fn itemized_costs() {
    let result = parse(
        "Full service done. Replaced engine oil, oil filter, air filter, and spark plugs. \
         Checked brakes and did wheel alignment. Labor 1000, parts 3000, total 4000 rupees. \
         Odometer reading 40000 km.",
    );
    let replaced = names(&result.parts_replaced);
    for expected in ["Engine Oil", "Oil Filter", "Air Filter", "Spark Plug"] {
        assert!(replaced.contains(&expected), "missing {expected}");
    }
    assert_eq!(result.labor_cost, 1000.0);
    assert_eq!(result.parts_cost, 3000.0);
    assert_eq!(result.total_cost, 4000.0);
    assert_eq!(result.odometer_reading, Some(40000));
    assert!(result.work_summary.ends_with("Total cost: Rs4000.00"));
}

#[test]
fn four_tires_with_balancing() {
    let result = parse(
        "Replaced all 4 tires with new ones. Cost 8000 rupees \
         including wheel balancing and alignment. Vehicle at 35000 km.",
    );
    let tire = &result.parts_replaced[0];
    assert_eq!(tire.id, "tire");
    assert_eq!(tire.quantity, 4);
    assert_eq!(tire.total_price(), 8000.0);
    let replaced = names(&result.parts_replaced);
    assert!(replaced.contains(&"Wheel Balancing"));
    assert!(replaced.contains(&"Wheel Alignment"));
    assert_eq!(result.total_cost, 8000.0);
    assert_eq!(result.odometer_reading, Some(35000));
}

#[test]
fn emergency_battery_replacement() {
    let result = parse(
        "Battery not holding charge. Replaced with new battery. \
         Cost 3500 rupees. Odometer 28000 km. Emergency repair.",
    );
    assert!(names(&result.parts_replaced).contains(&"Battery"));
    assert_eq!(result.service_type, ServiceType::Repair);
    assert_eq!(result.total_cost, 3500.0);
    assert_eq!(result.odometer_reading, Some(28000));
}

#[test]
fn mixed_list_with_implied_oil_change() {
    let result = parse(
        "Did oil change, replaced air filter, new wiper blades, \
         and wheel alignment. Total bill 4500 rupees. Car at 28000 km.",
    );
    let replaced = names(&result.parts_replaced);
    for expected in ["Engine Oil", "Air Filter", "Wiper Blades", "Wheel Alignment"] {
        assert!(replaced.contains(&expected), "missing {expected}");
    }
    assert_eq!(result.total_cost, 4500.0);
    assert_eq!(result.odometer_reading, Some(28000));
}

#[test]
fn implied_oil_change_only() {
    let result = parse("Oil change done. 1200 rupees.");
    assert_eq!(names(&result.parts_replaced), vec!["Engine Oil"]);
    assert_eq!(result.parts_replaced[0].detection_method, DetectionMethod::ImpliedPhrase);
    assert_eq!(result.total_cost, 1200.0);
}

#[test]
fn repaired_parts_are_kept_apart() {
    let result = parse("Fixed the alternator, cost 1500 rupees");
    assert!(result.parts_replaced.is_empty());
    assert_eq!(names(&result.parts_repaired), vec!["Alternator"]);
    assert!(result.raw_parts_found.is_empty());
    assert_eq!(result.total_cost, 1500.0);
}

#[test]
fn date_hints() {
    let result = parse("Changed engine oil today, next service at 20000 km");
    let json = serde_json::to_value(&result.date_info).unwrap();
    assert_eq!(json["service_date"], "today");
    assert_eq!(json["has_next_service"], true);
    assert!(json.get("specific_date").is_none());
}

#[test]
fn result_serializes_with_stable_keys() {
    let result = parse("Changed engine oil for 600 rupees");
    let value = serde_json::to_value(&result).unwrap();
    for key in [
        "transcript",
        "service_type",
        "parts_replaced",
        "parts_repaired",
        "labor_cost",
        "parts_cost",
        "total_cost",
        "odometer_reading",
        "date_info",
        "work_summary",
        "confidence_score",
        "parsed_successfully",
        "raw_parts_found",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    assert!(value["odometer_reading"].is_null());
}

#[test]
fn batch_evaluation_of_reference_cases() {
    let parser = ServiceParser::new().unwrap();
    let cases: Vec<EvaluationCase> = serde_json::from_str(
        r#"[
            {"input": "Changed oil filter and engine oil for 1200 rupees at 15000 km",
             "expected_parts": ["Engine Oil", "Oil Filter"], "expected_cost": 1200.0},
            {"input": "Replaced brake pads front and rear, total 3000 rupees",
             "expected_parts": ["Brake Pads"], "expected_cost": 3000.0},
            {"input": "Full service with air filter, oil filter, engine oil change. 2500 rupees",
             "expected_parts": ["Air Filter", "Oil Filter", "Engine Oil"], "expected_cost": 2500.0}
        ]"#,
    )
    .unwrap();

    let report = evaluate(&parser, &cases);
    assert_eq!(report.summary.total_tests, 3);
    assert_eq!(report.summary.average_parts_accuracy, 100.0);
    assert_eq!(report.summary.cost_accuracy, 100.0);
    assert!(report.results.iter().all(|r| r.parsed.parsed_successfully));
}

#[test]
fn parser_is_shared_across_threads() {
    let parser = std::sync::Arc::new(ServiceParser::new().unwrap());
    let handles: Vec<_> = ["Changed engine oil for 800 rupees", "Replaced battery, 2500 rupees"]
        .into_iter()
        .map(|text| {
            let parser = std::sync::Arc::clone(&parser);
            std::thread::spawn(move || parser.parse(text))
        })
        .collect();
    for handle in handles {
        let result = handle.join().unwrap();
        assert!(!result.parts_replaced.is_empty());
        assert!(result.total_cost > 0.0);
    }
}
