//! Integration tests for batch payslip evaluation against the reference fixture.

use payroll_core::calculations::common::round_half_up;
use payroll_core::{PayrollEngine, SalaryType};
use payroll_data::{PayslipLoadError, PayslipLoader, PayslipRecord};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const PAYSLIPS_CSV: &str = include_str!("../test-data/payslips.csv");

fn fixture_records() -> Vec<PayslipRecord> {
    PayslipLoader::parse(PAYSLIPS_CSV.as_bytes()).expect("Failed to parse fixture")
}

#[test]
fn test_fixture_parses_every_row() {
    let records = fixture_records();

    let employees: Vec<&str> = records.iter().map(|r| r.employee.as_str()).collect();
    assert_eq!(
        employees,
        vec!["alice", "bilel", "carla", "dali", "emna", "farah", "ghazi", "hana"]
    );
    assert!(records.iter().all(PayslipRecord::has_expectations));
}

#[test]
fn test_fixture_reproduces_every_expected_figure() {
    let engine = PayrollEngine::current();
    let records = fixture_records();

    let results = PayslipLoader::evaluate(&engine, &records);

    for (record, result) in records.iter().zip(results) {
        let calculation = result.unwrap_or_else(|e| panic!("{}: {e}", record.employee));
        let mismatches = PayslipLoader::compare(record, &calculation, dec!(0.01));
        assert!(
            mismatches.is_empty(),
            "{} mismatched: {:?}",
            record.employee,
            mismatches
        );
    }
}

#[test]
fn test_net_record_is_solved_back_to_base() {
    let engine = PayrollEngine::current();
    let records = fixture_records();
    let ghazi = records
        .iter()
        .find(|r| r.employee == "ghazi")
        .expect("ghazi row");

    let results = PayslipLoader::evaluate(&engine, std::slice::from_ref(ghazi));
    let calculation = results
        .into_iter()
        .next()
        .expect("one result")
        .expect("valid record");

    assert_eq!(calculation.salary_type, SalaryType::Net);
    let outcome = calculation.solve.expect("net requests carry a solve outcome");
    assert!(outcome.converged);
    assert!((round_half_up(calculation.base_salary) - dec!(1000)).abs() <= dec!(0.05));
}

#[test]
fn test_gross_record_under_code_334_matches_base_record() {
    let engine = PayrollEngine::current();
    let records = fixture_records();
    let results = PayslipLoader::evaluate(&engine, &records);

    let by_name = |name: &str| {
        let index = records
            .iter()
            .position(|r| r.employee == name)
            .expect("employee present");
        results[index].clone().expect("valid record")
    };

    let dali = by_name("dali");
    let hana = by_name("hana");

    assert_eq!(hana.base_salary, dec!(2000));
    assert_eq!(hana.result, dali.result);
}

#[test]
fn test_invalid_rows_are_reported_per_employee() {
    let csv = "employee,salary_type,amount,contract,children\n\
               ok,base,1000,1,\n\
               bad_contract,base,1000,99,\n\
               too_many_children,base,1000,1,1:c;2:c;3:c;4:c;5:c\n";
    let records = PayslipLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

    let results = PayslipLoader::evaluate(&PayrollEngine::current(), &records);

    assert!(results[0].is_ok());
    let rejected: Vec<String> = results
        .iter()
        .filter_map(|r| match r {
            Err(PayslipLoadError::InvalidRecord { employee, .. }) => Some(employee.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(rejected, vec!["bad_contract", "too_many_children"]);
}
