use dpia_core::assessment::{assess, ComplianceIssue, ProcessingProfile};
use dpia_core::reconcile::{reconcile_payload, ExternalOutcome, ResultOrigin};
use dpia_core::render::{render_result, EnglishCatalog};
use dpia_core::Level;
use pretty_assertions::assert_eq;

fn payroll() -> ProcessingProfile {
    ProcessingProfile {
        project_name: "Payroll".to_string(),
        sensitive_data: true,
        encryption: false,
        access_controls: true,
        data_minimization: true,
        ..Default::default()
    }
}

#[test]
fn test_malformed_payloads_yield_no_result() {
    let profile = payroll();
    for payload in [
        "",
        "null",
        "Sorry, I can't classify this.",
        "```json\n{\"overallRisk\": }\n```",
        r#"{"overallRisk": "high"}"#,
        r#"{"overallRisk": "high", "risks": "none", "recommendations": []}"#,
    ] {
        let outcome = reconcile_payload(payload, &profile);
        assert!(
            matches!(outcome, ExternalOutcome::Unavailable(_)),
            "payload {:?} gave {:?}",
            payload,
            outcome
        );
        let (result, origin) = outcome.resolve(&profile);
        assert_eq!(origin, ResultOrigin::Local);
        assert_eq!(result, assess(&profile));
    }
}

#[test]
fn test_external_low_still_flags_unencrypted_sensitive_data() {
    let payload = r#"
        The assessment:
        {
          "overallRisk": "low",
          "risks": [
            {"id": "x1", "category": "confidentiality", "description": "Salary data",
             "likelihood": "low", "impact": "high", "severity": "low",
             "mitigation": ["Encrypt exports"]}
          ],
          "recommendations": [
            {"priority": "low", "title": "Document processing"},
            {"priority": "high", "title": "Encrypt payroll data", "legalBasis": "Art. 8 DSG"}
          ],
          "complianceStatus": {"art22": true, "issues": []}
        }
    "#;
    let profile = payroll();
    let (result, origin) = reconcile_payload(payload, &profile).resolve(&profile);

    assert_eq!(origin, ResultOrigin::External);
    assert_eq!(result.overall_risk, Level::Low);
    // low x high
    assert_eq!(result.risks[0].severity(), Level::Medium);
    assert!(!result.compliance_status.compliant);
    assert_eq!(
        result.compliance_status.issues,
        vec![ComplianceIssue::SensitiveDataRequiresEncryption]
    );
    assert_eq!(result.recommendations[0].id, "ai-rec-2");
    assert_eq!(result.recommendations[1].id, "ai-rec-1");

    let rendered = render_result(&result, &EnglishCatalog);
    assert_eq!(rendered.risks[0].description, "Salary data");
    assert_eq!(rendered.risks[0].mitigation, vec!["Encrypt exports".to_string()]);
    assert!(rendered
        .risk_reasoning
        .unwrap()
        .contains("external classification"));
}
