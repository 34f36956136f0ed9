#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use subfilter::{
    filter_xml, from_xml_str, subtree_filter, subtree_filter_with_config, to_xml, FilterConfig,
    MixedSelection, Node,
};

const DATASTORE: &str = r#"
<top xmlns="http://example.com/schema/1.2/config">
  <users>
    <user>
      <name>root</name>
      <type>superuser</type>
      <full-name>Charlie Root</full-name>
      <company-info>
        <dept>1</dept>
        <id>1</id>
      </company-info>
    </user>
    <user>
      <name>fred</name>
      <type>admin</type>
      <full-name>Fred Flintstone</full-name>
      <company-info>
        <dept>2</dept>
        <id>2</id>
      </company-info>
    </user>
    <user>
      <name>barney</name>
      <type>admin</type>
      <full-name>Barney Rubble</full-name>
      <company-info>
        <dept>2</dept>
        <id>3</id>
      </company-info>
    </user>
  </users>
</top>
"#;

const ENTIRE_USERS: &str = r#"
<top xmlns="http://example.com/schema/1.2/config">
  <users/>
</top>
"#;

const ALL_USER: &str = r#"
<top xmlns="http://example.com/schema/1.2/config">
  <users>
    <user/>
  </users>
</top>
"#;

const SELECT_ALL_NAME: &str = r#"
<top xmlns="http://example.com/schema/1.2/config">
  <users>
    <user>
      <name/>
    </user>
  </users>
</top>
"#;

const SELECT_ALL_FOR_USER: &str = r#"
<top xmlns="http://example.com/schema/1.2/config">
  <users>
    <user>
      <name>fred</name>
    </user>
  </users>
</top>
"#;

const SELECT_SPECIFIC_FOR_USER: &str = r#"
<top xmlns="http://example.com/schema/1.2/config">
  <users>
    <user>
      <name>fred</name>
      <type/>
      <full-name/>
    </user>
  </users>
</top>
"#;

const SELECT_MULTIPLE: &str = r#"
<top xmlns="http://example.com/schema/1.2/config">
  <users>
    <user>
      <name>root</name>
      <company-info/>
    </user>
    <user>
      <name>fred</name>
      <company-info>
        <id/>
      </company-info>
    </user>
    <user>
      <name>barney</name>
      <type>superuser</type>
      <company-info>
        <dept/>
      </company-info>
    </user>
  </users>
</top>
"#;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn datastore() -> Node {
    from_xml_str(DATASTORE).unwrap()
}

fn users_of(result: &Node) -> Vec<&Node> {
    result
        .find_first_named("users")
        .map(|users| users.get_children_named("user"))
        .unwrap_or_default()
}

fn child_names(node: &Node) -> Vec<&str> {
    node.get_all_children()
        .iter()
        .map(|child| child.name.as_str())
        .collect()
}

#[test]
fn test_entire_users() -> TestResult {
    let filter = from_xml_str(ENTIRE_USERS)?;
    let result = subtree_filter(&datastore(), &filter)?;
    assert_eq!(result, Some(datastore()));
    Ok(())
}

#[test]
fn test_all_user() -> TestResult {
    let filter = from_xml_str(ALL_USER)?;
    let result = subtree_filter(&datastore(), &filter)?;
    assert_eq!(result, Some(datastore()));
    Ok(())
}

#[test]
fn test_select_all_names() -> TestResult {
    let filter = from_xml_str(SELECT_ALL_NAME)?;
    let result = subtree_filter(&datastore(), &filter)?.unwrap();

    assert_eq!(
        result.get_attribute("xmlns"),
        "http://example.com/schema/1.2/config"
    );
    let users = users_of(&result);
    assert_eq!(users.len(), 3);
    for user in &users {
        assert_eq!(child_names(user), vec!["name"]);
    }
    let names: Vec<_> = users
        .iter()
        .filter_map(|user| user.find_first_named("name"))
        .map(Node::get_text)
        .collect();
    assert_eq!(names, vec!["root", "fred", "barney"]);
    Ok(())
}

#[test]
fn test_select_all_for_user() -> TestResult {
    let filter = from_xml_str(SELECT_ALL_FOR_USER)?;
    let data = datastore();
    let result = subtree_filter(&data, &filter)?.unwrap();

    let users = users_of(&result);
    assert_eq!(users.len(), 1);
    let fred = users_of(&data)[1];
    assert_eq!(users[0], fred);
    assert_eq!(
        child_names(users[0]),
        vec!["name", "type", "full-name", "company-info"]
    );
    Ok(())
}

#[test]
fn test_select_specific_for_user() -> TestResult {
    let filter = from_xml_str(SELECT_SPECIFIC_FOR_USER)?;
    let result = subtree_filter(&datastore(), &filter)?.unwrap();

    let expected = from_xml_str(
        r#"<top xmlns="http://example.com/schema/1.2/config"><users><user>
             <name>fred</name><type>admin</type><full-name>Fred Flintstone</full-name>
           </user></users></top>"#,
    )?;
    assert_eq!(result, expected);
    Ok(())
}

#[test]
fn test_select_specific_for_user_selectors_only() -> TestResult {
    let filter = from_xml_str(SELECT_SPECIFIC_FOR_USER)?;
    let config = FilterConfig::new().with_mixed(MixedSelection::SelectorsOnly);
    let result = subtree_filter_with_config(&datastore(), &filter, config)?.unwrap();

    let users = users_of(&result);
    assert_eq!(users.len(), 1);
    assert_eq!(child_names(users[0]), vec!["type", "full-name"]);
    assert_eq!(
        users[0].find_first_named("full-name").map(Node::get_text),
        Some("Fred Flintstone")
    );
    Ok(())
}

#[test]
fn test_select_multiple() -> TestResult {
    let filter = from_xml_str(SELECT_MULTIPLE)?;
    let result = subtree_filter(&datastore(), &filter)?.unwrap();

    let expected = from_xml_str(
        r#"<top xmlns="http://example.com/schema/1.2/config"><users>
             <user>
               <name>root</name>
               <company-info><dept>1</dept><id>1</id></company-info>
             </user>
             <user>
               <name>fred</name>
               <company-info><id>2</id></company-info>
             </user>
           </users></top>"#,
    )?;
    assert_eq!(result, expected);
    Ok(())
}

#[test]
fn test_namespace_attribute_must_match() -> TestResult {
    let filter = from_xml_str(r#"<top xmlns="http://example.com/schema/2.0/config"><users/></top>"#)?;
    assert_eq!(subtree_filter(&datastore(), &filter)?, None);

    let unqualified = from_xml_str("<top><users/></top>")?;
    assert!(subtree_filter(&datastore(), &unqualified)?.is_some());
    Ok(())
}

#[test]
fn test_root_mismatch() -> TestResult {
    let filter = from_xml_str("<config><users/></config>")?;
    assert_eq!(subtree_filter(&datastore(), &filter)?, None);
    Ok(())
}

#[test]
fn test_unknown_user_selects_nothing() -> TestResult {
    let filter = from_xml_str("<top><users><user><name>wilma</name></user></users></top>")?;
    assert_eq!(subtree_filter(&datastore(), &filter)?, None);
    Ok(())
}

#[test]
fn test_nested_criterion_does_not_gate_parent() -> TestResult {
    // dept=2 is a criterion for company-info only; at the user level both
    // filter children are selectors
    let filter = from_xml_str(
        "<top><users><user><company-info><dept>2</dept></company-info><name/></user></users></top>",
    )?;
    let data = datastore();
    let result = subtree_filter(&data, &filter)?.unwrap();

    let users = users_of(&result);
    assert_eq!(users.len(), 3);
    assert_eq!(child_names(users[0]), vec!["name"]);
    assert_eq!(child_names(users[1]), vec!["company-info", "name"]);
    assert_eq!(child_names(users[2]), vec!["company-info", "name"]);
    assert_eq!(
        users[1].find_first_named("company-info"),
        users_of(&data)[1].find_first_named("company-info")
    );
    Ok(())
}

#[test]
fn test_sibling_criterion_gates_parent() -> TestResult {
    let filter = from_xml_str(
        "<top><users><user><type>admin</type><full-name/></user></users></top>",
    )?;
    let result = subtree_filter(&datastore(), &filter)?.unwrap();

    let full_names: Vec<_> = users_of(&result)
        .iter()
        .filter_map(|user| user.find_first_named("full-name"))
        .map(Node::get_text)
        .collect();
    assert_eq!(full_names, vec!["Fred Flintstone", "Barney Rubble"]);
    Ok(())
}

#[test]
fn test_filter_is_idempotent() -> TestResult {
    for filter in [
        SELECT_ALL_NAME,
        SELECT_ALL_FOR_USER,
        SELECT_SPECIFIC_FOR_USER,
        SELECT_MULTIPLE,
    ] {
        let filter = from_xml_str(filter)?;
        let once = subtree_filter(&datastore(), &filter)?.unwrap();
        let reparsed = from_xml_str(&to_xml(&once))?;
        assert_eq!(subtree_filter(&reparsed, &filter)?, Some(once));
    }
    Ok(())
}

#[test]
fn test_overlapping_selectors_repeat_matches() -> TestResult {
    // Both user selectors match fred, so each pass lists him once per selector
    let filter = from_xml_str(
        "<top><users>\
           <user><name>fred</name><type/></user>\
           <user><type>admin</type><name/></user>\
         </users></top>",
    )?;

    let once = subtree_filter(&datastore(), &filter)?.unwrap();
    let users = users_of(&once);
    let shapes: Vec<(&str, Vec<&str>)> = users
        .iter()
        .map(|user| (user.find_first_named("name").unwrap().get_text(), child_names(user)))
        .collect();
    assert_eq!(
        shapes,
        vec![
            ("fred", vec!["name", "type"]),
            ("fred", vec!["type", "name"]),
            ("barney", vec!["type", "name"]),
        ]
    );

    let twice = subtree_filter(&once, &filter)?.unwrap();
    let names: Vec<&str> = users_of(&twice)
        .iter()
        .map(|user| user.find_first_named("name").unwrap().get_text())
        .collect();
    assert_eq!(names, vec!["fred", "fred", "fred", "fred", "barney"]);
    Ok(())
}

#[test]
fn test_filter_xml_convenience() -> TestResult {
    let result = filter_xml(DATASTORE, SELECT_ALL_FOR_USER)?;
    assert_eq!(result.map(|node| users_of(&node).len()), Some(1));
    assert!(filter_xml(DATASTORE, "<top><nothing/></top>")?.is_none());
    assert!(filter_xml("<top>", SELECT_ALL_NAME).is_err());
    Ok(())
}
