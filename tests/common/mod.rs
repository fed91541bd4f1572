use std::collections::HashMap;
use std::sync::Arc;

use rasp_scrape::{Scraper, Settings};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const FACULTIES: &str = r#"<html><body>
<div class="parity">14 учебная неделя</div>
<ul>
  <li><a id="mark-1" role="tab" aria-controls="fac-1">Судоводительский</a></li>
  <li><a id="mark-2" role="tab" aria-controls="fac-2">Электромеханический</a></li>
</ul>
<div id="fac-1">
  <a href="/gs/faculties/timeline?grp=30">Б-11</a>
  <a href="/gs/faculties/timeline?grp=10">А-21</a>
  <a href="/gs/faculties/timeline?grp=12">А-05</a>
</div>
<div id="fac-2">
  <a href="/gs/faculties/timeline?grp=40">ЭМ-11</a>
</div>
</body></html>"#;

pub const TEACHERS: &str = r#"<html><body>
<a class="tutors_item" href="/gs/teachers/timeline?tut=2">Петров П.П.</a>
<a class="tutors_item" href="/gs/teachers/timeline?tut=9"></a>
<a class="tutors_item" href="/gs/teachers/timeline?tut=1">Иванов И.И.</a>
</body></html>"#;

/// A group week page: 7 rows of time + Monday..Saturday, links to weeks 13 and 15.
pub fn group_week(subject: &str) -> String {
    let header = "<tr><th>Время</th><th>Понедельник<br>14-10-2024</th><th>Вторник<br>15-10-2024</th>\
                  <th>Среда<br>16-10-2024</th><th>Четверг<br>17-10-2024</th>\
                  <th>Пятница<br>18-10-2024</th><th>Суббота<br>19-10-2024</th></tr>";
    let mut rows = String::new();
    for slot in 1..=7 {
        let monday = if slot == 1 {
            format!("лек {subject} 305/2 Иванов И.И.")
        } else {
            String::new()
        };
        let wednesday = if slot == 3 {
            "лаб Химия 201/3 Петров П.П. 1 лаб Химия 202/3 Сидоров С.С. 2".to_string()
        } else {
            String::new()
        };
        rows.push_str(&format!(
            "<tr><td>{slot} пара</td><td>{monday}</td><td></td><td>{wednesday}</td>\
             <td></td><td></td><td></td></tr>"
        ));
    }
    format!(
        "<html><body>\
         <a href=\"?grp=12&amp;week=13\">13</a><a href=\"?grp=12&amp;week=15\">15</a>\
         <a href=\"?grp=12&amp;week=16\">далее</a>\
         <table>{header}{rows}</table></body></html>"
    )
}

pub const TEACHER_WEEK: &str = r#"<html><body><table>
<tr><th>Время</th><th>Понедельник<br>14-10-2024</th><th>Вторник<br>15-10-2024</th></tr>
<tr><td>2 пара</td><td></td><td>пр Теория автоматов 305/2 ИВТ-21</td></tr>
</table></body></html>"#;

/// Serve `pages` (request target to body) on a local port; anything else is a 404.
pub async fn serve(pages: HashMap<String, String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let pages = Arc::new(pages);
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let pages = pages.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = stream.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let response = match pages.get(&target) {
                    Some(body) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

/// The whole fixture site: faculties, teachers, group 12 weeks 13..15, teacher 1.
pub async fn site() -> String {
    let pages = HashMap::from([
        ("/gs/faculties/".to_string(), FACULTIES.to_string()),
        ("/gs/teachers/".to_string(), TEACHERS.to_string()),
        ("/gs/faculties/timeline?grp=12".to_string(), group_week("Программирование")),
        ("/gs/faculties/timeline?grp=12&week=13".to_string(), group_week("Физика")),
        ("/gs/faculties/timeline?grp=12&week=15".to_string(), group_week("Механика")),
        ("/gs/teachers/timeline?tut=1".to_string(), TEACHER_WEEK.to_string()),
    ]);
    serve(pages).await
}

/// An address nobody listens on.
pub async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn scraper(base_url: &str) -> Scraper {
    Scraper::new(Settings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        requests_per_second: 1000,
        ..Settings::default()
    })
    .unwrap()
}
