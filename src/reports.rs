use serde::Serialize;

use crate::model::{Grade, Student};

/// Raw (unrounded) averages at or above this pass.
pub const PASS_AVERAGE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: String,
    pub average: Option<f64>,
    pub grade: Option<Grade>,
}

impl Standing {
    pub fn of(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            average: student.average_mark(),
            grade: student.grade_from_average(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBucket {
    pub grade: Grade,
    pub students: Vec<Standing>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeGroups {
    /// Students with no subjects.
    pub unmarked: Vec<Standing>,
    /// One bucket per grade, Z through HD, empty buckets included.
    pub buckets: Vec<GradeBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassFailGroups {
    pub unmarked: Vec<Standing>,
    pub fail: Vec<Standing>,
    pub pass: Vec<Standing>,
}

pub fn group_by_grade(students: &[Student]) -> GradeGroups {
    let mut unmarked = Vec::new();
    let mut buckets: Vec<GradeBucket> = Grade::ALL
        .iter()
        .map(|g| GradeBucket {
            grade: *g,
            students: Vec::new(),
        })
        .collect();

    for student in students {
        let standing = Standing::of(student);
        match standing.grade {
            None => unmarked.push(standing),
            Some(g) => {
                if let Some(bucket) = buckets.iter_mut().find(|b| b.grade == g) {
                    bucket.students.push(standing);
                }
            }
        }
    }

    GradeGroups { unmarked, buckets }
}

pub fn group_pass_fail(students: &[Student]) -> PassFailGroups {
    let mut groups = PassFailGroups {
        unmarked: Vec::new(),
        fail: Vec::new(),
        pass: Vec::new(),
    };
    for student in students {
        let standing = Standing::of(student);
        match standing.average {
            None => groups.unmarked.push(standing),
            Some(avg) if avg >= PASS_AVERAGE => groups.pass.push(standing),
            Some(_) => groups.fail.push(standing),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subject;

    fn student(email: &str, marks: &[i64]) -> Student {
        let mut s = Student::new(Some(email.len().to_string()), None, email, "Secret123");
        for (i, m) in marks.iter().enumerate() {
            s.subjects.push(Subject::new(i.to_string(), *m));
        }
        s
    }

    #[test]
    fn grade_groups_follow_rounded_average() {
        let students = vec![
            student("none@x.com", &[]),
            student("c@x.com", &[64, 65]),
            student("hd@x.com", &[90, 95]),
            student("z@x.com", &[30]),
        ];
        let groups = group_by_grade(&students);
        assert_eq!(groups.unmarked.len(), 1);
        assert_eq!(groups.buckets.len(), 5);

        let emails = |g: Grade| -> Vec<String> {
            groups
                .buckets
                .iter()
                .find(|b| b.grade == g)
                .map(|b| b.students.iter().map(|s| s.email.clone()).collect())
                .unwrap_or_default()
        };
        assert_eq!(emails(Grade::C), vec!["c@x.com"]);
        assert_eq!(emails(Grade::HD), vec!["hd@x.com"]);
        assert_eq!(emails(Grade::Z), vec!["z@x.com"]);
        assert!(emails(Grade::P).is_empty());
    }

    #[test]
    fn pass_fail_uses_raw_average() {
        // 49.5 rounds to a P grade but is still a fail.
        let students = vec![
            student("edge@x.com", &[49, 50]),
            student("pass@x.com", &[50]),
            student("new@x.com", &[]),
        ];
        let groups = group_pass_fail(&students);
        assert_eq!(groups.fail.len(), 1);
        assert_eq!(groups.fail[0].email, "edge@x.com");
        assert_eq!(groups.fail[0].grade, Some(Grade::P));
        assert_eq!(groups.pass.len(), 1);
        assert_eq!(groups.unmarked.len(), 1);
    }
}
