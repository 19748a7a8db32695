#[cfg(test)]
mod tests {
    use crate::config::ScanOptions;
    use crate::dom::{self, Document};
    use crate::error::DIAG_MALFORMED_EXPRESSION;
    use crate::scan::{scan, ScanReport, Scanner};
    use crate::value::ParsedValue;
    use serde_json::json;

    fn doc(html: &str) -> Document {
        Document::parse(html).unwrap()
    }

    #[test]
    fn test_name_only_marker() {
        let d = doc(r#"<div data-wd-bind="testEmpty"></div>"#);
        let result = scan(&d.root());
        assert_eq!(result.bindings.len(), 1);

        let binding = &result.bindings[0];
        assert_eq!(binding.name, "testEmpty");
        assert_eq!(binding.value, None);
        assert!(binding.values.is_empty());
        assert!(binding.targets.is_empty());
    }

    #[test]
    fn test_multi_value_marker() {
        let d = doc(r#"<div data-wd-bind="myBinder: 'here', p2: 2, p3: 3"></div>"#);
        let result = scan(&d.root());
        let binding = &result.bindings[0];

        assert_eq!(binding.name, "myBinder");
        assert_eq!(binding.value, Some(ParsedValue::from("here")));
        assert_eq!(binding.values.get("p2"), Some(&ParsedValue::from(2i64)));
        assert_eq!(binding.values.get("p3"), Some(&ParsedValue::from(3i64)));
        assert_eq!(binding.values.len(), 2);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_object_literal_marker() {
        let d = doc(r#"<div data-wd-bind="card: { name: 'weld', version: 1, awesome: true }"></div>"#);
        let result = scan(&d.root());
        let value = result.bindings[0].value.clone().unwrap();
        assert_eq!(
            serde_json::Value::from(value),
            json!({ "name": "weld", "version": 1, "awesome": true })
        );
    }

    #[test]
    fn test_bindings_in_document_order() {
        let d = doc(
            r#"<section data-wd-bind="outer"><p data-wd-bind="inner: 1"></p></section><div data-wd-bind="last"></div>"#,
        );
        let names: Vec<String> = scan(&d.root())
            .bindings
            .iter()
            .map(|b| b.name.clone())
            .collect();
        assert_eq!(names, vec!["outer", "inner", "last"]);
    }

    #[test]
    fn test_root_itself_is_not_scanned() {
        let d = doc(r#"<div id="root" data-wd-bind="self"><span data-wd-bind="child"></span></div>"#);
        let root = d.get_element_by_id("root").unwrap();
        let result = scan(&root);
        assert_eq!(result.bindings.len(), 1);
        assert_eq!(result.bindings[0].name, "child");
    }

    #[test]
    fn test_legacy_alias_and_canonical_precedence() {
        let d = doc(
            r#"<div wd-bind="legacy: 1"></div><div data-wd-bind="canonical" wd-bind="ignored"></div>"#,
        );
        let names: Vec<String> = scan(&d.root())
            .bindings
            .iter()
            .map(|b| b.name.clone())
            .collect();
        assert_eq!(names, vec!["legacy", "canonical"]);
    }

    #[test]
    fn test_aliases_can_be_disabled() {
        let d = doc(r#"<div wd-bind="legacy"></div><div data-wd-bind="canonical"></div>"#);
        let scanner = Scanner::new(ScanOptions {
            legacy_aliases: false,
            ..ScanOptions::default()
        });
        let result = scanner.scan(&d.root());
        assert_eq!(result.bindings.len(), 1);
        assert_eq!(result.bindings[0].name, "canonical");
    }

    #[test]
    fn test_custom_attribute_names() {
        let options = ScanOptions::from_json(
            r#"{ "bindAttribute": "data-bind", "targetAttribute": "data-ref" }"#,
        )
        .unwrap();
        let d = doc(r#"<div data-bind="panel: 'x'"><b data-ref="title"></b></div>"#);
        let result = Scanner::new(options).scan(&d.root());
        assert_eq!(result.bindings[0].name, "panel");
        assert_eq!(result.bindings[0].target_names(), vec!["title"]);
    }

    #[test]
    fn test_empty_names_are_skipped() {
        let d = doc(r#"<div data-wd-bind=""></div><div data-wd-bind=" : 1"></div>"#);
        assert!(scan(&d.root()).bindings.is_empty());
    }

    #[test]
    fn test_value_attribute_supplies_primary() {
        let d = doc(
            r#"<div data-wd-bind="a" data-wd-attr="here"></div><div wd-bind="b" wd-attr="{ n: 2 }"></div><div data-wd-bind="c: 1" data-wd-attr="ignored"></div>"#,
        );
        let result = scan(&d.root());
        assert_eq!(result.bindings[0].value, Some(ParsedValue::from("here")));
        assert_eq!(
            result.bindings[1].value.as_ref().and_then(|v| v.get("n")),
            Some(&ParsedValue::from(2i64))
        );
        assert_eq!(result.bindings[2].value, Some(ParsedValue::from(1i64)));
    }

    #[test]
    fn test_targets_collected_by_name() {
        let d = doc(
            r#"<div data-wd-bind="testTarget"><div id="a" data-wd-target="a"></div><p><span id="b" wd-target="b"></span></p></div>"#,
        );
        let result = scan(&d.root());
        let binding = &result.bindings[0];
        assert_eq!(binding.target_names(), vec!["a", "b"]);
        assert!(dom::same_element(
            binding.target("a").unwrap(),
            &d.get_element_by_id("a").unwrap()
        ));
        assert!(dom::same_element(
            binding.target("b").unwrap(),
            &d.get_element_by_id("b").unwrap()
        ));
    }

    #[test]
    fn test_target_name_collision_last_wins() {
        let d = doc(
            r#"<div data-wd-bind="dup"><i id="first" data-wd-target="t"></i><i id="second" data-wd-target="t"></i></div>"#,
        );
        let result = scan(&d.root());
        let target = result.bindings[0].target("t").unwrap();
        assert_eq!(dom::get_attribute(target, "id").as_deref(), Some("second"));
    }

    #[test]
    fn test_targets_scoped_to_nearest_binding() {
        let d = doc(
            r#"<div data-wd-bind="outer"><span data-wd-target="mine"></span><div data-wd-bind="inner" data-wd-target="child"><span data-wd-target="theirs"></span></div></div>"#,
        );
        let result = scan(&d.root());
        assert_eq!(result.bindings[0].name, "outer");
        assert_eq!(result.bindings[0].target_names(), vec!["child", "mine"]);
        assert_eq!(result.bindings[1].name, "inner");
        assert_eq!(result.bindings[1].target_names(), vec!["theirs"]);
    }

    #[test]
    fn test_malformed_expression_recorded() {
        let d = doc(
            r#"<div data-wd-bind="broken: { name: 'weld'"></div><div data-wd-bind="fine: 1"></div>"#,
        );
        let result = scan(&d.root());
        assert_eq!(result.bindings.len(), 2);
        assert_eq!(result.bindings[0].value, Some(ParsedValue::empty_mapping()));
        assert!(result.bindings[0].values.is_empty());
        assert_eq!(result.bindings[1].value, Some(ParsedValue::from(1i64)));

        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.code, DIAG_MALFORMED_EXPRESSION);
        assert_eq!(diag.binder.as_deref(), Some("broken"));
        assert_eq!(diag.attribute, "data-wd-bind");
        assert_eq!(diag.source, "{ name: 'weld'");
    }

    #[test]
    fn test_malformed_value_attribute_recorded() {
        let d = doc(r#"<div wd-bind="x" wd-attr="'open"></div>"#);
        let result = scan(&d.root());
        assert_eq!(result.bindings[0].value, Some(ParsedValue::empty_mapping()));
        assert_eq!(result.diagnostics[0].attribute, "wd-attr");
    }

    #[test]
    fn test_scan_matching_parses_wanted_names_only() {
        let d = doc(r#"<div data-wd-bind="skip: { a: 1"></div><div data-wd-bind="keep: 2, n: 3"></div>"#);
        let result = Scanner::default().scan_matching(&d.root(), |name| name == "keep");

        assert_eq!(result.bindings.len(), 2);
        assert_eq!(result.bindings[0].name, "skip");
        assert_eq!(result.bindings[0].value, None);
        assert!(result.bindings[0].values.is_empty());
        assert_eq!(result.bindings[1].value, Some(ParsedValue::from(2i64)));
        assert_eq!(result.bindings[1].values.len(), 1);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_scan_does_not_mutate() {
        let html = r#"<div data-wd-bind="a: 1"><b data-wd-target="t">text</b></div>"#;
        let d = doc(html);
        let before: Vec<String> = dom::descendants(&d.root())
            .iter()
            .map(|h| format!("{:?}{:?}", dom::tag_name(h), dom::get_attribute(h, "data-wd-bind")))
            .collect();
        scan(&d.root());
        scan(&d.root());
        let after: Vec<String> = dom::descendants(&d.root())
            .iter()
            .map(|h| format!("{:?}{:?}", dom::tag_name(h), dom::get_attribute(h, "data-wd-bind")))
            .collect();
        assert_eq!(before, after);
        assert_eq!(dom::text_content(&d.root()), "text");
    }

    #[test]
    fn test_scan_report_serializes() {
        let d = doc(
            r#"<ul data-wd-bind="list: 'items', size: 2"><li data-wd-target="row"></li></ul>"#,
        );
        let result = scan(&d.root());
        let report = serde_json::to_value(ScanReport::from(&result)).unwrap();
        assert_eq!(
            report,
            json!({
                "bindings": [{
                    "name": "list",
                    "tag": "ul",
                    "value": "items",
                    "values": { "size": 2 },
                    "targets": ["row"]
                }],
                "diagnostics": []
            })
        );
    }
}
