use serde::{Deserialize, Serialize};

use crate::utils::AppResult;

/// En person i en släktlinje, så som den ligger i datamängden
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urdu_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse_role: Option<String>,
    /// Barn i visningsordning
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Person>,
}

/// Vilken av de två personerna i en nod som avses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PersonSide {
    #[default]
    Main,
    Spouse,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn with_spouse(mut self, spouse: &str, spouse_role: &str) -> Self {
        self.spouse = Some(spouse.to_string());
        self.spouse_role = Some(spouse_role.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<Person>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Antal personer i hela delträdet (inklusive denna)
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Person::count).sum::<usize>()
    }

    pub fn name_for(&self, side: PersonSide) -> Option<&str> {
        match side {
            PersonSide::Main => Some(self.name.as_str()),
            PersonSide::Spouse => self.spouse.as_deref(),
        }
    }

    pub fn role_for(&self, side: PersonSide) -> Option<&str> {
        match side {
            PersonSide::Main => self.role.as_deref(),
            PersonSide::Spouse => self.spouse_role.as_deref(),
        }
    }

    pub fn image_for(&self, side: PersonSide) -> Option<&str> {
        match side {
            PersonSide::Main => self.image.as_deref(),
            PersonSide::Spouse => self.spouse_image.as_deref(),
        }
    }

    /// Etikett under noden: "Namn & Make/Maka" om partner finns
    pub fn couple_label(&self) -> String {
        match &self.spouse {
            Some(spouse) => format!("{} & {}", self.name, spouse),
            None => self.name.clone(),
        }
    }

    /// Kort tagg i nodcirkeln: rollkod eller första bokstaven i namnet
    pub fn tag_for(&self, side: PersonSide) -> String {
        let code = match (side, self.role_for(side)) {
            (PersonSide::Main, Some("S")) => Some("S"),
            (PersonSide::Main, Some("D")) => Some("D"),
            (PersonSide::Main, Some("Root")) => Some("R"),
            (PersonSide::Spouse, Some("W")) => Some("W"),
            (PersonSide::Spouse, Some("H")) => Some("H"),
            _ => None,
        };

        match code {
            Some(code) => code.to_string(),
            None => self
                .name_for(side)
                .and_then(|n| n.chars().next())
                .map(|c| c.to_string())
                .unwrap_or_else(|| "?".to_string()),
        }
    }

    /// Fullständig rollbeteckning för visning
    pub fn role_label_for(&self, side: PersonSide) -> String {
        match self.role_for(side) {
            Some("S") => "Son".to_string(),
            Some("D") => "Dotter".to_string(),
            Some("Root") => "Stamfader".to_string(),
            Some("W") => "Hustru".to_string(),
            Some("H") => "Make".to_string(),
            Some(other) if !other.trim().is_empty() => other.to_string(),
            _ => "Ättling".to_string(),
        }
    }
}

/// Inbyggda släktlinjer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lineage {
    #[default]
    Paternal,
    Maternal,
}

impl Lineage {
    pub fn all() -> &'static [Lineage] {
        &[Self::Paternal, Self::Maternal]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Paternal => "Fädernet",
            Self::Maternal => "Mödernet",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Self::Paternal => include_str!("../../resources/data/paternal.json"),
            Self::Maternal => include_str!("../../resources/data/maternal.json"),
        }
    }

    /// Läs in släktlinjens rotperson
    pub fn load(&self) -> AppResult<Person> {
        let root = serde_json::from_str(self.source())?;
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn couple() -> Person {
        Person::new("p1", "Syed Abid Miya")
            .with_role("S")
            .with_spouse("Syeda Waheeda Bano", "W")
    }

    #[test]
    fn test_tags() {
        let person = couple();
        assert_eq!(person.tag_for(PersonSide::Main), "S");
        assert_eq!(person.tag_for(PersonSide::Spouse), "W");

        let root = Person::new("r", "Hazrat").with_role("Root");
        assert_eq!(root.tag_for(PersonSide::Main), "R");

        let free = Person::new("x", "Musa").with_role("کے فرزند");
        assert_eq!(free.tag_for(PersonSide::Main), "M");
        assert_eq!(free.tag_for(PersonSide::Spouse), "?");
    }

    #[test]
    fn test_role_labels() {
        let person = couple();
        assert_eq!(person.role_label_for(PersonSide::Main), "Son");
        assert_eq!(person.role_label_for(PersonSide::Spouse), "Hustru");

        let unknown = Person::new("u", "Okänd");
        assert_eq!(unknown.role_label_for(PersonSide::Main), "Ättling");
    }

    #[test]
    fn test_couple_label() {
        assert_eq!(couple().couple_label(), "Syed Abid Miya & Syeda Waheeda Bano");
        assert_eq!(Person::new("a", "Yaqoob").couple_label(), "Yaqoob");
    }

    #[test]
    fn test_json_field_names() {
        let json = r#"{
            "id": "a",
            "name": "Hazrat",
            "urduName": "حضرت",
            "spouse": "Bi",
            "spouseRole": "W",
            "children": [{ "id": "b", "name": "Barn", "role": "D" }]
        }"#;
        let person: Person = serde_json::from_str(json).unwrap();
        assert_eq!(person.urdu_name.as_deref(), Some("حضرت"));
        assert_eq!(person.spouse_role.as_deref(), Some("W"));
        assert_eq!(person.children.len(), 1);
        assert!(person.children[0].children.is_empty());
        assert_eq!(person.count(), 2);
    }

    #[test]
    fn test_bundled_lineages_load() {
        for lineage in Lineage::all() {
            let root = lineage.load().unwrap();
            assert!(!root.id.is_empty());
            assert!(root.has_children(), "{:?} saknar barn", lineage);
        }
    }

    #[test]
    fn test_bundled_ids_are_unique() {
        fn collect<'a>(p: &'a Person, out: &mut Vec<&'a str>) {
            out.push(&p.id);
            for c in &p.children {
                collect(c, out);
            }
        }

        for lineage in Lineage::all() {
            let root = lineage.load().unwrap();
            let mut ids = Vec::new();
            collect(&root, &mut ids);
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), total, "dubbletter i {:?}", lineage);
        }
    }
}
